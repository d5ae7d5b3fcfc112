//! `roomcheck` - CLI for the breakfast check-in tracker
//!
//! Guests run `check-in`; staff use the PIN-gated `admin` commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use roomcheck::cli::{AdminAction, AdminCommand, Cli, Command, ConfigCommand, OutputFormat};
use roomcheck::config::StorageBackend;
use roomcheck::{init_logging, open_store, Config, Notice, Overview, Severity, Tracker};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command; config commands never touch the store
    match cli.command {
        Command::CheckIn(cmd) => handle_check_in(&open_tracker(&config)?, &cmd.room, cmd.format),
        Command::Status(cmd) => handle_status(&open_tracker(&config)?, &config, cmd.json),
        Command::Admin(cmd) => handle_admin(&open_tracker(&config)?, &config, cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_tracker(config: &Config) -> anyhow::Result<Tracker> {
    let store = open_store(config)?;
    Ok(Tracker::from_config(store, config))
}

/// Print a notice and map it to an exit code.
fn report(notice: &Notice) -> ExitCode {
    if notice.is_error() {
        eprintln!("{notice}");
        ExitCode::FAILURE
    } else {
        println!("{notice}");
        ExitCode::SUCCESS
    }
}

fn handle_check_in(tracker: &Tracker, room: &str, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let result = tracker.check_in(room);
    let notice = match &result {
        Ok(outcome) => Notice::from(*outcome),
        Err(err) => Notice::for_error(err),
    };

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "outcome": result.as_ref().ok(),
                "notice": &notice,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(if notice.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        OutputFormat::Plain => Ok(report(&notice)),
    }
}

fn handle_status(tracker: &Tracker, config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let open = tracker.is_open();
    let range = tracker.range();
    let features = tracker.features();
    let location = match config.storage.backend {
        StorageBackend::Sqlite => config.database_path().display().to_string(),
        StorageBackend::Json => config.json_dir().display().to_string(),
        StorageBackend::Memory => "(memory)".to_string(),
    };

    if json {
        let status = serde_json::json!({
            "open": open,
            "backend": tracker.store().backend_name(),
            "location": location,
            "rooms": { "min": range.min(), "max": range.max() },
            "manual_rooms": features.manual_rooms,
            "unexpected_log": features.unexpected_log,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("roomcheck status");
        println!("----------------");
        println!(
            "Check-ins:      {}",
            if open { "open" } else { "not open (no room list)" }
        );
        println!("Rooms:          {}-{}", range.min(), range.max());
        println!("Backend:        {}", tracker.store().backend_name());
        println!("Location:       {location}");
        println!("Manual rooms:   {}", features.manual_rooms);
        println!("Unexpected log: {}", features.unexpected_log);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_admin(tracker: &Tracker, config: &Config, cmd: AdminCommand) -> anyhow::Result<ExitCode> {
    let session = match tracker.admin(&cmd.pin) {
        Ok(session) => session,
        Err(err) => return Ok(report(&Notice::for_error(&err))),
    };
    if let Some(warning) = config.default_secret_warning() {
        warn!("{}", warning);
    }

    let notice = match cmd.action {
        AdminAction::Upload { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read room list {}", file.display()))?;
            match session.upload_roster(&text) {
                Ok(upload) => Notice::for_upload(&upload),
                Err(err) => Notice::for_error(&err),
            }
        }
        AdminAction::AddRoom { room } => match session.add_manual_room(&room) {
            Ok(added) => Notice::for_manual_add(added),
            Err(err) => Notice::for_error(&err),
        },
        AdminAction::Reset { yes } => {
            if !yes && !confirm("This clears the room list, manual rooms and all check-ins.")? {
                println!("Reset cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            match session.reset() {
                Ok(()) => Notice::new(Severity::Success, "All records cleared."),
                Err(err) => Notice::for_error(&err),
            }
        }
        AdminAction::Overview { json } => {
            print_overview(&session.overview(), json)?;
            return Ok(ExitCode::SUCCESS);
        }
        AdminAction::Watch { interval } => {
            let period = interval
                .filter(|secs| *secs > 0)
                .map_or_else(|| config.refresh_interval(), Duration::from_secs);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start refresh timer")?;
            runtime.block_on(roomcheck::refresh::watch(session, period, |overview| {
                // Clear the screen and redraw from the top.
                print!("\x1b[2J\x1b[H{}", overview.render_text());
                let _ = io::stdout().flush();
            }));
            return Ok(ExitCode::SUCCESS);
        }
    };

    Ok(report(&notice))
}

fn print_overview(overview: &Overview, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(overview)?);
    } else {
        print!("{}", overview.render_text());
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} Continue? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let mut shown = config.clone();
            shown.admin.secret = "********".to_string();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Rooms]");
                println!("  Min room:           {}", shown.rooms.min_room);
                println!("  Max room:           {}", shown.rooms.max_room);
                println!();
                println!("[Admin]");
                println!("  Default PIN:        {}", config.uses_default_secret());
                println!();
                println!("[Features]");
                println!("  Manual rooms:       {}", shown.features.manual_rooms);
                println!("  Unexpected log:     {}", shown.features.unexpected_log);
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", shown.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!("  JSON directory:     {}", config.json_dir().display());
                println!();
                println!("[Overview]");
                println!(
                    "  Refresh (secs):     {}",
                    shown.overview.refresh_interval_secs
                );
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
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
