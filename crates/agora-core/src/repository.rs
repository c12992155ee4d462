//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups that may legitimately
//! miss return `Option`; `get_*` lookups return
//! [`AgoraError::NotFound`](crate::error::AgoraError::NotFound) instead.

use uuid::Uuid;

use crate::error::AgoraResult;
use crate::models::{
    group::{CreateGroup, Group, UpdateGroup},
    group_membership::{CreateGroupMembership, GroupMembership},
    notification::{CreateNotification, Notification},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = AgoraResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgoraResult<User>> + Send;
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = AgoraResult<Option<User>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = AgoraResult<User>> + Send;
}

// ---------------------------------------------------------------------------
// Groups and membership links
// ---------------------------------------------------------------------------

pub trait GroupRepository: Send + Sync {
    /// Persist a new group. Callers validate and normalize the input.
    fn create(&self, input: CreateGroup) -> impl Future<Output = AgoraResult<Group>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgoraResult<Group>> + Send;
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = AgoraResult<Option<Group>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateGroup,
    ) -> impl Future<Output = AgoraResult<Group>> + Send;
    /// Delete a group together with its membership links.
    fn delete(&self, id: Uuid) -> impl Future<Output = AgoraResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AgoraResult<PaginatedResult<Group>>> + Send;

    /// The group flagged `is_admin_group`, if any.
    fn find_admin_group(&self) -> impl Future<Output = AgoraResult<Option<Group>>> + Send;

    /// Groups with `show_at_directory`, by sort order then name.
    fn list_directory_groups(&self) -> impl Future<Output = AgoraResult<Vec<Group>>> + Send;

    /// Non-admin groups with `show_at_registration`, by name.
    fn list_registration_groups(&self) -> impl Future<Output = AgoraResult<Vec<Group>>> + Send;

    /// Create a membership link.
    ///
    /// Fails with `AlreadyExists` if the (group, user) pair is linked.
    fn add_member(
        &self,
        input: CreateGroupMembership,
    ) -> impl Future<Output = AgoraResult<GroupMembership>> + Send;

    /// Remove a membership link. Returns `false` if none existed.
    fn remove_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = AgoraResult<bool>> + Send;

    fn get_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = AgoraResult<Option<GroupMembership>>> + Send;

    fn count_members(&self, group_id: Uuid) -> impl Future<Output = AgoraResult<u64>> + Send;

    /// Count manager links, optionally restricted to one user.
    fn count_managers(
        &self,
        group_id: Uuid,
        user_id: Option<Uuid>,
    ) -> impl Future<Output = AgoraResult<u64>> + Send;

    fn get_members(
        &self,
        group_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AgoraResult<PaginatedResult<User>>> + Send;

    fn get_managers(&self, group_id: Uuid) -> impl Future<Output = AgoraResult<Vec<User>>> + Send;

    fn get_user_groups(&self, user_id: Uuid) -> impl Future<Output = AgoraResult<Vec<Group>>> + Send;
}

// ---------------------------------------------------------------------------
// Settings (module-scoped key/value store)
// ---------------------------------------------------------------------------

pub trait SettingsRepository: Send + Sync {
    fn get(
        &self,
        module_id: &str,
        name: &str,
    ) -> impl Future<Output = AgoraResult<Option<String>>> + Send;
    fn set(
        &self,
        module_id: &str,
        name: &str,
        value: &str,
    ) -> impl Future<Output = AgoraResult<()>> + Send;
    fn delete(&self, module_id: &str, name: &str) -> impl Future<Output = AgoraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

pub trait NotificationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateNotification,
    ) -> impl Future<Output = AgoraResult<Notification>> + Send;
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AgoraResult<Vec<Notification>>> + Send;
}
