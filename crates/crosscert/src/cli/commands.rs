//! CLI command definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::events::NewEvent;
use crate::registration::RegistrationStatus;

/// Registration status commands.
#[derive(Debug, Subcommand)]
pub enum StatusCommand {
    /// Show the registration status for an event
    Get {
        /// Event identifier
        event: String,
    },

    /// Overwrite the registration status for an event
    Set {
        /// Event identifier
        event: String,

        /// New status: not_registered, registered or checked_in
        status: RegistrationStatus,
    },

    /// Summarize the local storage database and stored registrations
    Summary {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List every event with a stored status
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Event catalog commands.
#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events, optionally filtered by name
    List(ListCommand),

    /// Show one event
    Show {
        /// Event identifier
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create and save a new event
    Create(CreateCommand),

    /// Delete a saved event
    Delete {
        /// Event identifier
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Event list arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only events whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Event creation arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Event name
    #[arg(short, long)]
    pub name: String,

    /// Event date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Start time, e.g. 09:00
    #[arg(long)]
    pub start_time: Option<String>,

    /// End time, e.g. 17:00
    #[arg(long)]
    pub end_time: Option<String>,

    /// Venue name
    #[arg(long)]
    pub venue: Option<String>,

    /// Cover image URL or data URI
    #[arg(long)]
    pub cover_image: Option<String>,

    /// Expected number of participants
    #[arg(long, default_value = "0")]
    pub participants: u64,
}

impl From<CreateCommand> for NewEvent {
    fn from(cmd: CreateCommand) -> Self {
        Self {
            name: cmd.name,
            date: cmd.date,
            participants: cmd.participants,
            cover_image: cmd.cover_image,
            start_time: cmd.start_time,
            end_time: cmd.end_time,
            venue: cmd.venue,
        }
    }
}

/// Participant pass commands.
#[derive(Debug, Subcommand)]
pub enum PassCommand {
    /// Show your check-in codes for an event (registers you)
    Show {
        /// Event identifier
        event: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Record that you checked in to an event
    CheckIn {
        /// Event identifier
        event: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One event name per line
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_create_command_into_new_event() {
        let cmd = CreateCommand {
            name: "Career Fair".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 20),
            start_time: Some("09:00".to_string()),
            end_time: None,
            venue: Some("Gym".to_string()),
            cover_image: None,
            participants: 120,
        };
        let new: NewEvent = cmd.into();
        assert_eq!(new.name, "Career Fair");
        assert_eq!(new.participants, 120);
        assert_eq!(new.venue.as_deref(), Some("Gym"));
    }
}
