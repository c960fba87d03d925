//! `crosscert` - event check-in and certificate portal
//!
//! The library keeps all portal state in a flat local key-value store: the
//! participant's registration status per event, and the list of saved
//! events. Consumers are handed a [`LocalStorage`] rather than reaching for a
//! global, so the same code runs against `SQLite` on disk or an in-memory map.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod pass;
pub mod registration;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{Event, EventCatalog, EventId, NewEvent};
pub use logging::init_logging;
pub use pass::{CheckInPass, PassDesk};
pub use registration::{RegistrationStatus, RegistrationStore};
pub use storage::{LocalStorage, MemoryStorage, SqliteStorage};
