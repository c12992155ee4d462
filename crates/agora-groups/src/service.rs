//! Group service — membership, listings and admin-group resolution.

use agora_core::error::{AgoraError, AgoraResult};
use agora_core::models::group::{CreateGroup, Group, UpdateGroup};
use agora_core::models::group_membership::{CreateGroupMembership, GroupMembership};
use agora_core::models::user::{User, UserRef};
use agora_core::repository::{
    GroupRepository, PaginatedResult, Pagination, SettingsRepository, UserRepository,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::actor::Actor;
use crate::admin_cache::AdminGroupCache;
use crate::notifier::Notifier;
use crate::settings::{DEFAULT_USER_GROUP, ModuleSettings, USER_MODULE};

/// Group service.
///
/// Generic over repository implementations so that this layer has no
/// dependency on the database crate.
pub struct GroupService<G, U, S, N> {
    groups: G,
    users: U,
    settings: ModuleSettings<S>,
    admin_cache: AdminGroupCache<S>,
    notifier: N,
}

impl<G, U, S, N> GroupService<G, U, S, N>
where
    G: GroupRepository,
    U: UserRepository,
    S: SettingsRepository + Clone,
    N: Notifier,
{
    pub fn new(groups: G, users: U, settings: S, notifier: N) -> Self {
        let settings = ModuleSettings::new(settings, USER_MODULE);
        Self {
            groups,
            users,
            admin_cache: AdminGroupCache::new(settings.clone()),
            settings,
            notifier,
        }
    }

    // -----------------------------------------------------------------
    // Group records
    // -----------------------------------------------------------------

    pub async fn get_group(&self, id: Uuid) -> AgoraResult<Group> {
        self.groups.get_by_id(id).await
    }

    pub async fn create_group(&self, input: CreateGroup) -> AgoraResult<Group> {
        input.validate()?;
        let group = self.groups.create(input).await?;

        if group.is_admin_group {
            self.admin_cache.invalidate().await?;
        }

        info!(group_id = %group.id, name = %group.name, "Group created");
        Ok(group)
    }

    pub async fn update_group(&self, id: Uuid, input: UpdateGroup) -> AgoraResult<Group> {
        let current = self.groups.get_by_id(id).await?;
        input.validate_against(&current)?;

        let touches_admin_flag = input.touches_admin_flag();
        let group = self.groups.update(id, input).await?;

        if touches_admin_flag && group.is_admin_group != current.is_admin_group {
            self.admin_cache.invalidate().await?;
        }

        debug!(group_id = %group.id, "Group updated");
        Ok(group)
    }

    pub async fn delete_group(&self, id: Uuid) -> AgoraResult<()> {
        let group = self.groups.get_by_id(id).await?;
        self.groups.delete(id).await?;

        if group.is_admin_group {
            self.admin_cache.invalidate().await?;
        }

        info!(group_id = %id, "Group deleted");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    /// Add a user to the group.
    ///
    /// Returns `false` without changes if the user already is a member.
    /// When the actor is signed in, the added user is notified.
    pub async fn add_user<'a>(
        &self,
        group: &Group,
        user: impl Into<UserRef<'a>>,
        is_manager: bool,
        actor: &Actor,
    ) -> AgoraResult<bool> {
        let user = user.into();
        let user_id = user.id();

        if self.groups.get_membership(group.id, user_id).await?.is_some() {
            return Ok(false);
        }

        let created = self
            .groups
            .add_member(CreateGroupMembership {
                group_id: group.id,
                user_id,
                is_group_manager: is_manager,
                created_by: actor.id(),
            })
            .await;

        if let Err(e) = created {
            // A concurrent insert of the same pair surfaces either as a
            // unique index violation or as a write conflict.
            if self.groups.get_membership(group.id, user_id).await?.is_some() {
                debug!(
                    group_id = %group.id,
                    user_id = %user_id,
                    error = %e,
                    "Membership created concurrently"
                );
                return Ok(false);
            }
            return Err(e);
        }

        info!(
            group_id = %group.id,
            user_id = %user_id,
            is_manager,
            "User added to group"
        );

        if let Actor::User(originator) = actor {
            let loaded;
            let recipient = match user.record() {
                Some(record) => record,
                None => {
                    loaded = self.users.get_by_id(user_id).await?;
                    &loaded
                }
            };

            if let Err(e) = self
                .notifier
                .include_group(group, originator, recipient)
                .await
            {
                warn!(
                    group_id = %group.id,
                    user_id = %user_id,
                    error = %e,
                    "Failed to notify user about group inclusion"
                );
            }
        }

        Ok(true)
    }

    /// Remove a user from the group. Returns `false` if not a member.
    pub async fn remove_user<'a>(
        &self,
        group: &Group,
        user: impl Into<UserRef<'a>>,
    ) -> AgoraResult<bool> {
        let user_id = user.into().id();
        let removed = self.groups.remove_member(group.id, user_id).await?;
        if removed {
            info!(group_id = %group.id, user_id = %user_id, "User removed from group");
        }
        Ok(removed)
    }

    pub async fn group_membership<'a>(
        &self,
        group: &Group,
        user: impl Into<UserRef<'a>>,
    ) -> AgoraResult<Option<GroupMembership>> {
        self.groups.get_membership(group.id, user.into().id()).await
    }

    pub async fn is_member<'a>(
        &self,
        group: &Group,
        user: impl Into<UserRef<'a>>,
    ) -> AgoraResult<bool> {
        Ok(self.group_membership(group, user).await?.is_some())
    }

    pub async fn is_manager<'a>(
        &self,
        group: &Group,
        user: impl Into<UserRef<'a>>,
    ) -> AgoraResult<bool> {
        let count = self
            .groups
            .count_managers(group.id, Some(user.into().id()))
            .await?;
        Ok(count > 0)
    }

    pub async fn has_manager(&self, group: &Group) -> AgoraResult<bool> {
        Ok(self.groups.count_managers(group.id, None).await? > 0)
    }

    pub async fn has_users(&self, group: &Group) -> AgoraResult<bool> {
        Ok(self.groups.count_members(group.id).await? > 0)
    }

    pub async fn managers(&self, group: &Group) -> AgoraResult<Vec<User>> {
        self.groups.get_managers(group.id).await
    }

    pub async fn members(
        &self,
        group: &Group,
        pagination: Pagination,
    ) -> AgoraResult<PaginatedResult<User>> {
        self.groups.get_members(group.id, pagination).await
    }

    pub async fn user_groups<'a>(&self, user: impl Into<UserRef<'a>>) -> AgoraResult<Vec<Group>> {
        self.groups.get_user_groups(user.into().id()).await
    }

    // -----------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------

    /// Groups offered at sign-up.
    ///
    /// A configured default group replaces the choice entirely.
    pub async fn registration_groups(&self) -> AgoraResult<Vec<Group>> {
        let configured = self.settings.get(DEFAULT_USER_GROUP).await?;

        if let Some(raw) = configured.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            match Uuid::parse_str(raw) {
                Ok(id) => match self.groups.find_by_id(id).await? {
                    Some(group) => return Ok(vec![group]),
                    None => warn!(group_id = %id, "Default registration group does not exist"),
                },
                Err(e) => warn!(value = %raw, error = %e, "Malformed default registration group"),
            }
        }

        self.groups.list_registration_groups().await
    }

    pub async fn directory_groups(&self) -> AgoraResult<Vec<Group>> {
        self.groups.list_directory_groups().await
    }

    // -----------------------------------------------------------------
    // Admin group
    // -----------------------------------------------------------------

    pub async fn admin_group(&self) -> AgoraResult<Option<Group>> {
        self.groups.find_admin_group().await
    }

    /// Id of the admin group, memoized in the settings store.
    pub async fn admin_group_id(&self) -> AgoraResult<Uuid> {
        self.admin_cache.get_or_resolve(&self.groups).await
    }

    pub fn admin_cache(&self) -> &AdminGroupCache<S> {
        &self.admin_cache
    }

    /// Startup check that an admin group exists.
    pub async fn verify_admin_group(&self) -> AgoraResult<Option<Uuid>> {
        match self.admin_group_id().await {
            Ok(id) => {
                info!(group_id = %id, "Admin group resolved");
                Ok(Some(id))
            }
            Err(AgoraError::NotFound { .. }) => {
                error!("No admin group is defined");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
