//! `SQLite` schema definitions for crosscert.

/// SQL statement to create the key-value table.
///
/// One row per key; `value` is whatever string the caller stored, usually JSON.
pub const CREATE_LOCAL_STORAGE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Statements that make up schema version 1.
pub const V1_STATEMENTS: &[&str] = &[CREATE_LOCAL_STORAGE_TABLE];
