//! `crosscert` - CLI for the CROSSCERT event portal
//!
//! Opens the local storage database named by the configuration and runs one
//! command against it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use crosscert::cli::{
    Cli, Command, ConfigCommand, EventsCommand, ListCommand, OutputFormat, PassCommand,
    StatusCommand,
};
use crosscert::events::{Event, EventCatalog};
use crosscert::pass::{CheckInPass, PassDesk};
use crosscert::registration::RegistrationStore;
use crosscert::storage::SqliteStorage;
use crosscert::{init_logging, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Status(status_cmd) => handle_status(&open_storage(&config)?, status_cmd),
        Command::Events(events_cmd) => {
            let storage = open_storage(&config)?;
            let catalog =
                EventCatalog::new(&storage).with_samples(config.catalog.include_samples);
            handle_events(&catalog, events_cmd)
        }
        Command::Pass(pass_cmd) => {
            let storage = open_storage(&config)?;
            handle_pass(&PassDesk::new(RegistrationStore::new(&storage)), pass_cmd)
        }
    }
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = config.database_path();
    SqliteStorage::open(&path, config.storage.wal)
        .with_context(|| format!("opening local storage at {}", path.display()))
}

fn handle_status(storage: &SqliteStorage, cmd: StatusCommand) -> anyhow::Result<()> {
    let store = RegistrationStore::new(storage);
    match cmd {
        StatusCommand::Get { event } => {
            println!("{}", store.get_registration_status(&event));
        }
        StatusCommand::Set { event, status } => {
            store.update_registration_status(&event, status)?;
            println!("{event}: {}", store.get_registration_status(&event));
        }
        StatusCommand::Summary { json } => {
            let stats = storage.stats()?;
            let registrations = store.records()?.len();
            if json {
                let summary = serde_json::json!({
                    "database_path": storage.path().display().to_string(),
                    "total_keys": stats.total_keys,
                    "registrations": registrations,
                    "schema_version": stats.schema_version,
                    "last_write": stats.last_write,
                    "db_size_bytes": stats.db_size_bytes,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("crosscert status");
                println!("----------------");
                println!("Database:       {}", storage.path().display());
                println!("Schema version: {}", stats.schema_version);
                println!("Stored keys:    {}", stats.total_keys);
                println!("Registrations:  {registrations}");
                println!(
                    "Last write:     {}",
                    stats.last_write.as_deref().unwrap_or("never")
                );
                println!("Size (bytes):   {}", stats.db_size_bytes);
            }
        }
        StatusCommand::List { json } => {
            let records = store.records()?;
            if json {
                let map: serde_json::Map<String, serde_json::Value> = records
                    .into_iter()
                    .map(|(id, status)| (id, serde_json::Value::from(status.as_str())))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else if records.is_empty() {
                println!("No registrations recorded.");
            } else {
                for (id, status) in records {
                    println!("{id:<20} {status}");
                }
            }
        }
    }
    Ok(())
}

fn handle_events(catalog: &EventCatalog<&SqliteStorage>, cmd: EventsCommand) -> anyhow::Result<()> {
    match cmd {
        EventsCommand::List(list) => print_events(catalog, &list)?,
        EventsCommand::Show { id, json } => {
            let event = catalog.get(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                print_event_detail(&event);
            }
        }
        EventsCommand::Create(create) => {
            let event = catalog.create(create.into())?;
            println!("Created event {} ({})", event.id, event.name);
        }
        EventsCommand::Delete { id, yes } => {
            if !yes {
                let event = catalog.get(&id)?;
                println!("This will delete \"{}\".", event.name);
                println!("Use --yes to confirm.");
                return Ok(());
            }
            if catalog.delete(&id)? {
                println!("Deleted event {id}.");
            } else if catalog.get(&id).is_ok() {
                bail!("event {id} is a built-in sample and cannot be deleted");
            } else {
                bail!("event not found: {id}");
            }
        }
    }
    Ok(())
}

fn print_events(catalog: &EventCatalog<&SqliteStorage>, list: &ListCommand) -> anyhow::Result<()> {
    let events = match &list.search {
        Some(term) => catalog.search(term),
        None => catalog.list(),
    };

    match list.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Plain => {
            for event in &events {
                println!("{}", event.name);
            }
        }
        OutputFormat::Table => {
            if events.is_empty() {
                println!("No events found.");
                return Ok(());
            }
            println!(
                "{:<16} {:<28} {:<14} {:>6} {:>6} {:>6} {:>6}",
                "ID", "NAME", "DATE", "REG", "ATT", "EVAL", "CERT"
            );
            for event in &events {
                println!(
                    "{:<16} {:<28} {:<14} {:>6} {:>6} {:>6} {:>6}",
                    event.id.to_string(),
                    event.name,
                    event.date,
                    event.participants,
                    event.attended,
                    event.evaluated,
                    event.certificates
                );
            }
        }
    }
    Ok(())
}

fn print_event_detail(event: &Event) {
    println!("{}", event.name);
    println!("{}", "=".repeat(event.name.chars().count()));
    println!("ID:            {}", event.id);
    println!("Date:          {}", event.date);
    if let Some(range) = event.time_range() {
        println!("Time:          {range}");
    }
    if let Some(venue) = &event.venue {
        println!("Venue:         {venue}");
    }
    println!("Participants:  {}", event.participants);
    println!("Attended:      {}", event.attended);
    println!("Evaluated:     {}", event.evaluated);
    println!("Certificates:  {}", event.certificates);
}

fn handle_pass(desk: &PassDesk<&SqliteStorage>, cmd: PassCommand) -> anyhow::Result<()> {
    match cmd {
        PassCommand::Show { event, json } => {
            let pass = desk.view_pass(&event)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pass)?);
            } else {
                print_pass(&pass);
            }
        }
        PassCommand::CheckIn { event } => {
            let status = desk.check_in(&event)?;
            println!("{event}: {status}");
        }
    }
    Ok(())
}

fn print_pass(pass: &CheckInPass) {
    let p = &pass.participant;
    println!("Your Check-In Codes");
    println!("-------------------");
    println!("Event:       {}", pass.event_id);
    println!("Name:        {}", p.name);
    println!("Email:       {}", p.email);
    println!("Department:  {}", p.department);
    println!("Program:     {}", p.program);
    println!("Code:        {}", p.check_in_code);
    println!("Barcode:     {}", p.barcode);
    println!("Status:      {}", pass.status);
    if let Some(action) = pass.next_action {
        println!("Next:        {}", action.label());
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  WAL journal:        {}", config.storage.wal);
                println!();
                println!("[Catalog]");
                println!("  Sample events:      {}", config.catalog.include_samples);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
