//! Participant check-in pass.
//!
//! Holds the transition policy the registration store leaves to its callers:
//! showing a participant their check-in codes registers them, and recording a
//! check-in marks them checked in. Codes are fixed sample values; nothing
//! here encodes a real QR code or barcode.

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::registration::{RegistrationStatus, RegistrationStore};
use crate::storage::LocalStorage;

/// The single local participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Academic department.
    pub department: String,
    /// Degree program.
    pub program: String,
    /// Alphanumeric check-in code shown under the QR placeholder.
    pub check_in_code: String,
    /// Numeric code shown under the barcode placeholder.
    pub barcode: String,
}

impl Default for Participant {
    fn default() -> Self {
        Self {
            name: "Juan Dela Cruz".to_string(),
            email: "juan.dela.cruz@example.com".to_string(),
            department: "College of Engineering".to_string(),
            program: "BS Computer Engineering".to_string(),
            check_in_code: "12345-ABCDE-67890".to_string(),
            barcode: "1234567890123".to_string(),
        }
    }
}

/// What the participant is offered next for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// Obtain check-in codes.
    Register,
    /// Check in at the venue.
    CheckIn,
}

impl NextAction {
    /// Button label for this action.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Register => "Register",
            Self::CheckIn => "Check In",
        }
    }

    /// The action offered for `status`; `None` once checked in.
    #[must_use]
    pub fn for_status(status: RegistrationStatus) -> Option<Self> {
        match status {
            RegistrationStatus::NotRegistered => Some(Self::Register),
            RegistrationStatus::Registered => Some(Self::CheckIn),
            RegistrationStatus::CheckedIn => None,
        }
    }
}

/// The codes and status shown to a participant for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInPass {
    /// Event the pass belongs to.
    pub event_id: String,
    /// Participant details and codes.
    pub participant: Participant,
    /// Status after the pass was viewed.
    pub status: RegistrationStatus,
    /// Action offered next, if any.
    pub next_action: Option<NextAction>,
}

/// Participant-facing operations over a [`RegistrationStore`].
#[derive(Debug, Clone)]
pub struct PassDesk<S> {
    store: RegistrationStore<S>,
    participant: Participant,
}

impl<S: LocalStorage> PassDesk<S> {
    /// Desk for the default sample participant.
    pub fn new(store: RegistrationStore<S>) -> Self {
        Self {
            store,
            participant: Participant::default(),
        }
    }

    /// The registration store behind this desk.
    pub fn store(&self) -> &RegistrationStore<S> {
        &self.store
    }

    /// Show the check-in pass for `event_id`.
    ///
    /// A participant who was not registered becomes `Registered`; an existing
    /// `Registered` or `CheckedIn` status is left as is.
    ///
    /// # Errors
    ///
    /// Returns an error if registering the participant cannot be persisted.
    pub fn view_pass(&self, event_id: &str) -> Result<CheckInPass> {
        let mut status = self.store.get_registration_status(event_id);
        if status == RegistrationStatus::NotRegistered {
            status = RegistrationStatus::Registered;
            self.store.update_registration_status(event_id, status)?;
            info!(event_id, "participant registered on viewing pass");
        }

        Ok(CheckInPass {
            event_id: event_id.to_string(),
            participant: self.participant.clone(),
            status,
            next_action: NextAction::for_status(status),
        })
    }

    /// Record that the participant checked in to `event_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new status cannot be persisted.
    pub fn check_in(&self, event_id: &str) -> Result<RegistrationStatus> {
        self.store
            .update_registration_status(event_id, RegistrationStatus::CheckedIn)?;
        info!(event_id, "participant checked in");
        Ok(RegistrationStatus::CheckedIn)
    }
}
