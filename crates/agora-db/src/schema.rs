//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings; enums are stored as strings with ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD display_name ON TABLE user TYPE string;
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['Disabled', 'Enabled', 'NeedApproval', \
    'SoftDeleted'];
DEFINE FIELD language ON TABLE user TYPE option<string>;
DEFINE FIELD registration_group_id ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Groups
-- =======================================================================
DEFINE TABLE group SCHEMAFULL;
DEFINE FIELD space_id ON TABLE group TYPE option<string>;
DEFINE FIELD name ON TABLE group TYPE string \
    ASSERT string::len($value) <= 45;
DEFINE FIELD description ON TABLE group TYPE string DEFAULT '';
DEFINE FIELD sort_order ON TABLE group TYPE int DEFAULT 100;
DEFINE FIELD show_at_directory ON TABLE group TYPE bool DEFAULT false;
DEFINE FIELD show_at_registration ON TABLE group TYPE bool \
    DEFAULT false;
DEFINE FIELD is_admin_group ON TABLE group TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE group TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD created_by ON TABLE group TYPE option<string>;
DEFINE FIELD updated_at ON TABLE group TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_by ON TABLE group TYPE option<string>;
DEFINE INDEX idx_group_directory ON TABLE group \
    COLUMNS show_at_directory, sort_order, name;

-- =======================================================================
-- User -> Group membership (one edge per pair)
-- =======================================================================
DEFINE TABLE member_of TYPE RELATION IN user OUT group SCHEMAFULL;
DEFINE FIELD is_group_manager ON TABLE member_of TYPE bool \
    DEFAULT false;
DEFINE FIELD created_at ON TABLE member_of TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD created_by ON TABLE member_of TYPE option<string>;
DEFINE INDEX idx_member_of_pair ON TABLE member_of \
    COLUMNS in, out UNIQUE;

-- =======================================================================
-- Module settings
-- =======================================================================
DEFINE TABLE setting SCHEMAFULL;
DEFINE FIELD module_id ON TABLE setting TYPE string;
DEFINE FIELD name ON TABLE setting TYPE string;
DEFINE FIELD content ON TABLE setting TYPE string;
DEFINE INDEX idx_setting_module_name ON TABLE setting \
    COLUMNS module_id, name UNIQUE;

-- =======================================================================
-- In-app notifications
-- =======================================================================
DEFINE TABLE notification SCHEMAFULL;
DEFINE FIELD user_id ON TABLE notification TYPE string;
DEFINE FIELD originator_id ON TABLE notification TYPE option<string>;
DEFINE FIELD kind ON TABLE notification TYPE string \
    ASSERT $value IN ['IncludeGroup'];
DEFINE FIELD source_table ON TABLE notification TYPE string;
DEFINE FIELD source_id ON TABLE notification TYPE string;
DEFINE FIELD seen ON TABLE notification TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_notification_user ON TABLE notification \
    COLUMNS user_id, created_at;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
