//! Group domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgoraError, AgoraResult};

/// Maximum length of a group name, in characters.
pub const GROUP_NAME_MAX_LEN: usize = 45;

/// Sort order assigned when none (or zero) is given.
pub const DEFAULT_SORT_ORDER: i32 = 100;

const ADMIN_REGISTRATION_CONFLICT: &str = "Admin group can't be a registration group!";

/// A named set of users with directory/registration visibility flags.
///
/// At most one group carries `is_admin_group`; its members hold
/// elevated privileges across the whole network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    /// Default space new members are added to, if any.
    pub space_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
    pub show_at_directory: bool,
    pub show_at_registration: bool,
    pub is_admin_group: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateGroup {
    pub space_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    /// `None` and `Some(0)` both resolve to [`DEFAULT_SORT_ORDER`].
    pub sort_order: Option<i32>,
    pub show_at_directory: bool,
    pub show_at_registration: bool,
    pub is_admin_group: bool,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateGroup {
    /// `Some(Some(id))` = set, `Some(None)` = clear, `None` = no change.
    pub space_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub show_at_directory: Option<bool>,
    pub show_at_registration: Option<bool>,
    pub is_admin_group: Option<bool>,
    pub updated_by: Option<Uuid>,
}

/// Resolve the stored sort order for a requested value.
pub fn effective_sort_order(requested: Option<i32>) -> i32 {
    match requested {
        None | Some(0) => DEFAULT_SORT_ORDER,
        Some(order) => order,
    }
}

fn validate_name(name: &str) -> AgoraResult<()> {
    if name.chars().count() > GROUP_NAME_MAX_LEN {
        return Err(AgoraError::validation(
            "name",
            format!("Name should contain at most {GROUP_NAME_MAX_LEN} characters."),
        ));
    }
    Ok(())
}

fn validate_show_at_registration(is_admin_group: bool, show_at_registration: bool) -> AgoraResult<()> {
    if is_admin_group && show_at_registration {
        return Err(AgoraError::validation(
            "show_at_registration",
            ADMIN_REGISTRATION_CONFLICT,
        ));
    }
    Ok(())
}

impl CreateGroup {
    /// Check field rules before the group is written.
    pub fn validate(&self) -> AgoraResult<()> {
        validate_name(&self.name)?;
        validate_show_at_registration(self.is_admin_group, self.show_at_registration)
    }
}

impl UpdateGroup {
    /// Validate the update as it would apply on top of `current`.
    pub fn validate_against(&self, current: &Group) -> AgoraResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_show_at_registration(
            self.is_admin_group.unwrap_or(current.is_admin_group),
            self.show_at_registration
                .unwrap_or(current.show_at_registration),
        )
    }

    /// Whether applying this update may change which group is the
    /// admin group.
    pub fn touches_admin_flag(&self) -> bool {
        self.is_admin_group.is_some()
    }
}
