//! Command-line interface for roomcheck.
//!
//! This module provides the CLI structure for the `roomcheck` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminAction, AdminCommand, CheckInCommand, ConfigCommand, OutputFormat, StatusCommand,
};

/// roomcheck - Breakfast check-in by room number
///
/// Guests check in with their room number; admins upload the expected rooms
/// and follow progress floor by floor.
#[derive(Debug, Parser)]
#[command(name = "roomcheck")]
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
    /// Check a room in for breakfast
    CheckIn(CheckInCommand),

    /// Show whether check-ins are open
    Status(StatusCommand),

    /// Admin operations (require the PIN)
    Admin(AdminCommand),

    /// View or validate configuration
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
