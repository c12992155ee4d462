//! SurrealDB implementation of [`SettingsRepository`].
//!
//! Each (module, name) pair maps to one `setting` record whose id is
//! derived from the pair, so writes are plain upserts.

use agora_core::error::AgoraResult;
use agora_core::repository::SettingsRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SettingRow {
    content: String,
}

fn record_key(module_id: &str, name: &str) -> Vec<String> {
    vec![module_id.to_string(), name.to_string()]
}

/// SurrealDB implementation of the module settings store.
#[derive(Clone)]
pub struct SurrealSettingsRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSettingsRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SettingsRepository for SurrealSettingsRepository<C> {
    async fn get(&self, module_id: &str, name: &str) -> AgoraResult<Option<String>> {
        let mut result = self
            .db
            .query("SELECT content FROM type::record('setting', $key)")
            .bind(("key", record_key(module_id, name)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SettingRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.content))
    }

    async fn set(&self, module_id: &str, name: &str, value: &str) -> AgoraResult<()> {
        self.db
            .query(
                "UPSERT type::record('setting', $key) SET \
                 module_id = $module_id, name = $name, content = $content",
            )
            .bind(("key", record_key(module_id, name)))
            .bind(("module_id", module_id.to_string()))
            .bind(("name", name.to_string()))
            .bind(("content", value.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("setting", e))?;

        Ok(())
    }

    async fn delete(&self, module_id: &str, name: &str) -> AgoraResult<()> {
        self.db
            .query("DELETE type::record('setting', $key)")
            .bind(("key", record_key(module_id, name)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("setting", e))?;

        Ok(())
    }
}
