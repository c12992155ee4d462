//! In-app notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    /// The recipient was added to a group.
    IncludeGroup,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::IncludeGroup => "IncludeGroup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IncludeGroup" => Some(NotificationKind::IncludeGroup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    pub originator_id: Option<Uuid>,
    pub kind: NotificationKind,
    /// Table of the subject entity (e.g. `group`).
    pub source_table: String,
    pub source_id: Uuid,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub originator_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub source_table: String,
    pub source_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_string_form_parses_back() {
        let kind = NotificationKind::IncludeGroup;
        assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        assert_eq!(NotificationKind::parse("Unknown"), None);
    }
}
