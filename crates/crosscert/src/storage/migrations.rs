//! Schema versioning for the local storage database.
//!
//! The applied version is tracked in `PRAGMA user_version`. Each migration
//! runs in its own transaction together with the version bump, so a crash
//! mid-migration leaves the previous version intact.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::V1_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Statements for each version, indexed by `version - 1`.
const MIGRATIONS: &[&[&str]] = &[V1_STATEMENTS];

/// Bring the database schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if the stored version is newer than this build knows
/// about, or if any migration statement fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for next in (version + 1)..=CURRENT_VERSION {
        apply_migration(conn, next)?;
    }
    Ok(())
}

/// Read the schema version. A fresh database reports 0.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

fn apply_migration(conn: &mut Connection, version: u32) -> Result<()> {
    let statements = usize::try_from(version)
        .ok()
        .and_then(|v| v.checked_sub(1))
        .and_then(|idx| MIGRATIONS.get(idx))
        .ok_or_else(|| Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        })?;

    debug!(version, "applying schema migration");
    let tx = conn.transaction()?;
    for statement in *statements {
        tx.execute_batch(statement)?;
    }
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()?;
    info!(version, "schema migrated");
    Ok(())
}
