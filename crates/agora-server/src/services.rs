//! Application services wired over one database client.

use agora_core::error::AgoraResult;
use agora_core::repository::UserRepository;
use agora_db::repository::{
    SurrealGroupRepository, SurrealNotificationRepository, SurrealSettingsRepository,
    SurrealUserRepository,
};
use agora_groups::{
    ApprovalNotifier, GroupError, GroupService, GroupsConfig, MailConfig, SmtpMailer,
    StoredNotifier, Translator,
};
use surrealdb::{Connection, Surreal};
use tracing::{info, warn};
use uuid::Uuid;

pub type Groups<C> = GroupService<
    SurrealGroupRepository<C>,
    SurrealUserRepository<C>,
    SurrealSettingsRepository<C>,
    StoredNotifier<SurrealNotificationRepository<C>>,
>;

pub type Approvals<C> =
    ApprovalNotifier<SurrealGroupRepository<C>, SurrealSettingsRepository<C>, SmtpMailer>;

/// Services shared by the running server.
pub struct Services<C: Connection> {
    pub groups: Groups<C>,
    pub approvals: Approvals<C>,
    users: SurrealUserRepository<C>,
}

impl<C: Connection + Clone> Services<C> {
    pub fn new(
        client: &Surreal<C>,
        groups_config: GroupsConfig,
        mail_config: &MailConfig,
    ) -> Result<Self, GroupError> {
        let groups = GroupService::new(
            SurrealGroupRepository::new(client.clone()),
            SurrealUserRepository::new(client.clone()),
            SurrealSettingsRepository::new(client.clone()),
            StoredNotifier::new(SurrealNotificationRepository::new(client.clone())),
        );

        let approvals = ApprovalNotifier::new(
            SurrealGroupRepository::new(client.clone()),
            SurrealSettingsRepository::new(client.clone()),
            SmtpMailer::new(mail_config)?,
            Translator::embedded()?,
            groups_config,
        );

        Ok(Self {
            groups,
            approvals,
            users: SurrealUserRepository::new(client.clone()),
        })
    }

    /// Startup checks. Returns whether an admin group exists.
    pub async fn startup(&self) -> AgoraResult<bool> {
        let admin = self.groups.verify_admin_group().await?;
        if admin.is_none() {
            warn!("Administrative features are unavailable until an admin group is created");
        }
        Ok(admin.is_some())
    }

    /// Hook for a completed sign-up: mails the managers of the user's
    /// registration group when the account awaits approval.
    pub async fn user_registered(&self, user_id: Uuid) -> AgoraResult<bool> {
        let user = self.users.get_by_id(user_id).await?;
        let sent = self.approvals.notify_admins_for_user_approval(&user).await?;
        if sent {
            info!(user_id = %user_id, "Approval requested from group managers");
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use agora_core::error::AgoraError;
    use agora_core::models::user::{CreateUser, UserStatus};
    use surrealdb::engine::local::{Db, Mem};

    use super::*;

    async fn services() -> (Surreal<Db>, Services<Db>) {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        agora_db::run_migrations(&db).await.unwrap();

        let services =
            Services::new(&db, GroupsConfig::default(), &MailConfig::default()).unwrap();
        (db, services)
    }

    #[tokio::test]
    async fn startup_reports_missing_admin_group() {
        let (_db, services) = services().await;
        assert!(!services.startup().await.unwrap());
    }

    #[tokio::test]
    async fn registration_without_approval_sends_nothing() {
        let (db, services) = services().await;
        let user = SurrealUserRepository::new(db)
            .create(CreateUser {
                username: "tom".into(),
                email: "tom@example.org".into(),
                display_name: "Tom".into(),
                status: UserStatus::NeedApproval,
                language: None,
                registration_group_id: None,
            })
            .await
            .unwrap();

        assert!(!services.user_registered(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn registration_of_unknown_user_fails() {
        let (_db, services) = services().await;
        let result = services.user_registered(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AgoraError::NotFound { .. })));
    }
}
