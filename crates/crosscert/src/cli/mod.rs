//! Command-line interface for crosscert.
//!
//! This module provides the CLI structure for the `crosscert` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CreateCommand, EventsCommand, ListCommand, OutputFormat, PassCommand,
    StatusCommand,
};

/// crosscert - Event check-in and certificate portal
///
/// Manage events and track your registration and check-in status for each
/// of them. All state is kept in a local database.
#[derive(Debug, Parser)]
#[command(name = "crosscert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read or write registration status
    #[command(subcommand)]
    Status(StatusCommand),

    /// Manage events
    #[command(subcommand)]
    Events(EventsCommand),

    /// Participant check-in codes
    #[command(subcommand)]
    Pass(PassCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationStatus;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "crosscert");
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["crosscert", "-q", "config", "path"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["crosscert", "config", "path"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["crosscert", "-v", "config", "path"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["crosscert", "-vv", "config", "path"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_status_get() {
        let cli = parse(&["crosscert", "status", "get", "evt-1"]);
        assert!(matches!(
            cli.command,
            Command::Status(StatusCommand::Get { ref event }) if event == "evt-1"
        ));
    }

    #[test]
    fn test_parse_status_set() {
        let cli = parse(&["crosscert", "status", "set", "evt-1", "checked_in"]);
        assert!(matches!(
            cli.command,
            Command::Status(StatusCommand::Set {
                status: RegistrationStatus::CheckedIn,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_status_set_accepts_every_stored_name() {
        for status in RegistrationStatus::ALL {
            let cli = parse(&["crosscert", "status", "set", "evt-1", status.as_str()]);
            match cli.command {
                Command::Status(StatusCommand::Set { status: parsed, .. }) => {
                    assert_eq!(parsed, status);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_status_set_rejects_unknown_status() {
        for name in ["promoted", "checked-in", "Registered"] {
            let result = Cli::try_parse_from(["crosscert", "status", "set", "evt-1", name]);
            assert!(result.is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn test_parse_status_summary() {
        let cli = parse(&["crosscert", "status", "summary", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Status(StatusCommand::Summary { json: true })
        ));
    }

    #[test]
    fn test_parse_events_list_with_search() {
        let cli = parse(&["crosscert", "events", "list", "--search", "python", "-f", "json"]);
        match cli.command {
            Command::Events(EventsCommand::List(list)) => {
                assert_eq!(list.search.as_deref(), Some("python"));
                assert_eq!(list.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_events_create() {
        let cli = parse(&[
            "crosscert",
            "events",
            "create",
            "--name",
            "Career Fair",
            "--date",
            "2025-01-20",
            "--venue",
            "Gym",
        ]);
        match cli.command {
            Command::Events(EventsCommand::Create(create)) => {
                assert_eq!(create.name, "Career Fair");
                assert_eq!(create.date.map(|d| d.to_string()).as_deref(), Some("2025-01-20"));
                assert_eq!(create.participants, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_events_create_rejects_bad_date() {
        let result =
            Cli::try_parse_from(["crosscert", "events", "create", "-n", "X", "-d", "Dec 15"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_pass_check_in() {
        let cli = parse(&["crosscert", "pass", "check-in", "2"]);
        assert!(matches!(
            cli.command,
            Command::Pass(PassCommand::CheckIn { ref event }) if event == "2"
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["crosscert", "-c", "/custom/config.toml", "config", "show"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
