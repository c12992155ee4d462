//! User domain model, reduced to what group membership needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    Disabled,
    Enabled,
    /// Registered, waiting for an administrator to approve the account.
    NeedApproval,
    SoftDeleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Disabled => "Disabled",
            UserStatus::Enabled => "Enabled",
            UserStatus::NeedApproval => "NeedApproval",
            UserStatus::SoftDeleted => "SoftDeleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Disabled" => Some(UserStatus::Disabled),
            "Enabled" => Some(UserStatus::Enabled),
            "NeedApproval" => Some(UserStatus::NeedApproval),
            "SoftDeleted" => Some(UserStatus::SoftDeleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub status: UserStatus,
    /// Preferred locale (e.g. `de`, `fi`); `None` uses the site default.
    pub language: Option<String>,
    /// Group chosen at sign-up.
    pub registration_group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub status: UserStatus,
    pub language: Option<String>,
    pub registration_group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub status: Option<UserStatus>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub language: Option<Option<String>>,
    pub registration_group_id: Option<Option<Uuid>>,
}

/// A user given either by id or by an already loaded record.
#[derive(Debug, Clone, Copy)]
pub enum UserRef<'a> {
    Id(Uuid),
    Record(&'a User),
}

impl UserRef<'_> {
    pub fn id(&self) -> Uuid {
        match self {
            UserRef::Id(id) => *id,
            UserRef::Record(user) => user.id,
        }
    }

    /// The loaded record, if the caller supplied one.
    pub fn record(&self) -> Option<&User> {
        match self {
            UserRef::Id(_) => None,
            UserRef::Record(user) => Some(user),
        }
    }
}

impl From<Uuid> for UserRef<'_> {
    fn from(id: Uuid) -> Self {
        UserRef::Id(id)
    }
}

impl From<&Uuid> for UserRef<'_> {
    fn from(id: &Uuid) -> Self {
        UserRef::Id(*id)
    }
}

impl<'a> From<&'a User> for UserRef<'a> {
    fn from(user: &'a User) -> Self {
        UserRef::Record(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            display_name: "Alice".into(),
            status: UserStatus::Enabled,
            language: None,
            registration_group_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_ref_resolves_same_id_from_both_forms() {
        let alice = user();
        let by_record: UserRef<'_> = (&alice).into();
        let by_id: UserRef<'_> = alice.id.into();

        assert_eq!(by_record.id(), alice.id);
        assert_eq!(by_id.id(), alice.id);
        assert!(by_record.record().is_some());
        assert!(by_id.record().is_none());
    }

    #[test]
    fn status_string_form_parses_back() {
        for status in [
            UserStatus::Disabled,
            UserStatus::Enabled,
            UserStatus::NeedApproval,
            UserStatus::SoftDeleted,
        ] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("Pending"), None);
    }
}
