//! Routine catalog schema.
//!
//! SQLite has no native stored routines, so installed routines live in
//! a catalog table owned by strata. Installation parses the routine
//! header and upserts a row; introspection reads it back. The catalog
//! is excluded from schema introspection so it never leaks into the
//! constants registry.

use rusqlite::Connection;
use strata_core::errors::DialectError;
use tracing::debug;

/// Name of the catalog table. Kept out of user-facing schema listings.
pub const CATALOG_TABLE: &str = "strata_routines";

pub const MIGRATION_SQL: &str = r#"
-- Routine catalog: one row per installed routine.
-- parameters_json holds the declaration-ordered parameter list.
CREATE TABLE IF NOT EXISTS strata_routines (
    routine_name TEXT PRIMARY KEY,
    schema_name TEXT,
    routine_kind TEXT NOT NULL,
    parameters_json TEXT NOT NULL,
    body TEXT NOT NULL,
    installed_at INTEGER NOT NULL
) STRICT;
"#;

/// Creates the catalog table when missing. Idempotent.
pub fn run_migrations(conn: &Connection) -> Result<(), DialectError> {
    conn.execute_batch(MIGRATION_SQL)
        .map_err(|e| DialectError::Sqlite {
            message: e.to_string(),
        })?;
    debug!("routine catalog ready");
    Ok(())
}
