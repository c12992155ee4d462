//! Database-specific error types and conversions.

use agora_core::error::AgoraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity} record")]
    Duplicate { entity: String },

    #[error("Malformed row: {0}")]
    Decode(String),
}

impl DbError {
    /// Classify a failed statement, recognising UNIQUE index
    /// violations.
    pub(crate) fn from_statement(entity: &str, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Duplicate {
                entity: entity.into(),
            }
        } else {
            DbError::Query(message)
        }
    }
}

impl From<DbError> for AgoraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AgoraError::NotFound { entity, id },
            DbError::Duplicate { entity } => AgoraError::AlreadyExists { entity },
            other => AgoraError::Database(other.to_string()),
        }
    }
}
