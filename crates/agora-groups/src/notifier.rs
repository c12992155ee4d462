//! In-app notification dispatch.

use agora_core::error::AgoraResult;
use agora_core::models::group::Group;
use agora_core::models::notification::{CreateNotification, NotificationKind};
use agora_core::models::user::User;
use agora_core::repository::NotificationRepository;
use tracing::info;

/// Delivers in-app notifications about group events.
pub trait Notifier: Send + Sync {
    /// Tell `recipient` that `originator` added them to `group`.
    fn include_group(
        &self,
        group: &Group,
        originator: &User,
        recipient: &User,
    ) -> impl Future<Output = AgoraResult<()>> + Send;
}

/// [`Notifier`] that stores notifications for the recipient's inbox.
#[derive(Debug, Clone)]
pub struct StoredNotifier<R> {
    repo: R,
}

impl<R: NotificationRepository> StoredNotifier<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: NotificationRepository> Notifier for StoredNotifier<R> {
    async fn include_group(
        &self,
        group: &Group,
        originator: &User,
        recipient: &User,
    ) -> AgoraResult<()> {
        let notification = self
            .repo
            .create(CreateNotification {
                user_id: recipient.id,
                originator_id: Some(originator.id),
                kind: NotificationKind::IncludeGroup,
                source_table: "group".into(),
                source_id: group.id,
            })
            .await?;

        info!(
            notification_id = %notification.id,
            group_id = %group.id,
            recipient_id = %recipient.id,
            originator_id = %originator.id,
            "Group inclusion notification sent"
        );

        Ok(())
    }
}
