//! SurrealDB implementation of [`NotificationRepository`].

use agora_core::error::AgoraResult;
use agora_core::models::notification::{CreateNotification, Notification, NotificationKind};
use agora_core::repository::NotificationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct NotificationRowWithId {
    record_id: String,
    user_id: String,
    originator_id: Option<String>,
    kind: String,
    source_table: String,
    source_id: String,
    seen: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRowWithId {
    fn try_into_notification(self) -> Result<Notification, DbError> {
        let kind = NotificationKind::parse(&self.kind)
            .ok_or_else(|| DbError::Decode(format!("unknown notification kind: {}", self.kind)))?;
        Ok(Notification {
            id: parse_uuid("notification", &self.record_id)?,
            user_id: parse_uuid("recipient", &self.user_id)?,
            originator_id: parse_optional_uuid("originator", self.originator_id.as_deref())?,
            kind,
            source_table: self.source_table,
            source_id: parse_uuid("source", &self.source_id)?,
            seen: self.seen,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Notification repository.
#[derive(Clone)]
pub struct SurrealNotificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNotificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> NotificationRepository for SurrealNotificationRepository<C> {
    async fn create(&self, input: CreateNotification) -> AgoraResult<Notification> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('notification', $id) SET \
                 user_id = $user_id, originator_id = $originator_id, \
                 kind = $kind, source_table = $source_table, \
                 source_id = $source_id; \
                 SELECT meta::id(id) AS record_id, * \
                 FROM type::record('notification', $id);",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("originator_id", input.originator_id.map(|u| u.to_string())))
            .bind(("kind", input.kind.as_str()))
            .bind(("source_table", input.source_table))
            .bind(("source_id", input.source_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("notification", e))?;

        let rows: Vec<NotificationRowWithId> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "notification".into(),
            id: id_str,
        })?;

        Ok(row.try_into_notification()?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AgoraResult<Vec<Notification>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM notification \
                 WHERE user_id = $user_id ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NotificationRowWithId> = result.take(0).map_err(DbError::from)?;
        let notifications = rows
            .into_iter()
            .map(|row| row.try_into_notification())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(notifications)
    }
}
