//! Error types for crosscert.
//!
//! Reads from the registration store and event catalog fail open and never
//! surface these errors; they describe infrastructure failures such as an
//! unopenable database, a failed write, or invalid configuration.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for crosscert operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The in-process storage lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    StoragePoisoned,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// No event with the given identifier exists.
    #[error("event not found: {id}")]
    EventNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// Saved events are unreadable, so writing the list back would lose them.
    #[error("saved events are unreadable: {message}")]
    UnreadableEvents {
        /// What made the stored value unreadable.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for crosscert operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an event-not-found error.
    #[must_use]
    pub fn event_not_found(id: impl Into<String>) -> Self {
        Self::EventNotFound { id: id.into() }
    }

    /// Create an unreadable-events error.
    #[must_use]
    pub fn unreadable_events(message: impl Into<String>) -> Self {
        Self::UnreadableEvents {
            message: message.into(),
        }
    }

    /// Check if this error means the requested event does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound { .. })
    }
}
