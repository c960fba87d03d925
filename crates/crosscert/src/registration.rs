//! Event registration status store.
//!
//! Maps an event identifier to the local participant's registration status
//! for that event. Records are created on first write, never deleted, and
//! read back as [`RegistrationStatus::NotRegistered`] when absent or
//! unreadable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::LocalStorage;

/// Prefix of every registration status key.
pub const STATUS_KEY_PREFIX: &str = "registration_status_";

/// The local participant's standing for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// No record exists for the event.
    #[default]
    NotRegistered,
    /// The participant has been issued check-in codes.
    Registered,
    /// The participant has checked in at the venue.
    CheckedIn,
}

impl RegistrationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::NotRegistered, Self::Registered, Self::CheckedIn];

    /// The wire name of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotRegistered => "not_registered",
            Self::Registered => "registered",
            Self::CheckedIn => "checked_in",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registration status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for RegistrationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Storage key for an event's registration status.
#[must_use]
pub fn status_key(event_id: &str) -> String {
    format!("{STATUS_KEY_PREFIX}{event_id}")
}

/// Reads and writes registration statuses through a [`LocalStorage`].
///
/// The store does not enforce transitions; it persists whatever status it
/// is handed.
#[derive(Debug, Clone)]
pub struct RegistrationStore<S> {
    storage: S,
}

impl<S: LocalStorage> RegistrationStore<S> {
    /// Wrap a storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current status for `event_id`.
    ///
    /// Never fails: a missing record, a value that is not a JSON-encoded
    /// status, or a backend read error all yield `NotRegistered`.
    pub fn get_registration_status(&self, event_id: &str) -> RegistrationStatus {
        let key = status_key(event_id);
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RegistrationStatus::NotRegistered,
            Err(err) => {
                warn!(event_id, error = %err, "failed to read registration status");
                return RegistrationStatus::NotRegistered;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(status) => status,
            Err(err) => {
                warn!(event_id, error = %err, "ignoring malformed registration status");
                RegistrationStatus::NotRegistered
            }
        }
    }

    /// Overwrite the status for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write. On success the new
    /// value is visible to the next read.
    pub fn update_registration_status(
        &self,
        event_id: &str,
        status: RegistrationStatus,
    ) -> Result<()> {
        let value = serde_json::to_string(&status)?;
        self.storage.set(&status_key(event_id), &value)?;
        debug!(event_id, %status, "registration status updated");
        Ok(())
    }

    /// Every event with a stored status, sorted by event id.
    ///
    /// Malformed records are reported as `NotRegistered`, matching reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot list its keys.
    pub fn records(&self) -> Result<Vec<(String, RegistrationStatus)>> {
        let records = self
            .storage
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(STATUS_KEY_PREFIX).map(str::to_string))
            .map(|event_id| {
                let status = self.get_registration_status(&event_id);
                (event_id, status)
            })
            .collect();
        Ok(records)
    }
}
