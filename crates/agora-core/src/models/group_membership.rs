//! Group membership link model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ties one user to one group. Unique per (group, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMembership {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub is_group_manager: bool,
    pub created_at: DateTime<Utc>,
    /// Acting user; `None` for guest or system actions.
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupMembership {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub is_group_manager: bool,
    pub created_by: Option<Uuid>,
}
