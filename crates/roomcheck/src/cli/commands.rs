//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Guest check-in arguments.
#[derive(Debug, Args)]
pub struct CheckInCommand {
    /// Room number
    pub room: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Admin command arguments.
#[derive(Debug, Args)]
pub struct AdminCommand {
    /// Admin PIN
    #[arg(long, env = "ROOMCHECK_PIN", hide_env_values = true, default_value = "")]
    pub pin: String,

    /// The admin action to run
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Admin actions.
#[derive(Debug, Subcommand)]
pub enum AdminAction {
    /// Replace the roster with a plain-text room list (one room per line)
    Upload {
        /// Path to the room list
        file: PathBuf,
    },

    /// Add a room that is missing from the roster
    AddRoom {
        /// Room number
        room: String,
    },

    /// Clear roster, manual rooms, check-ins and unexpected arrivals
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show check-in progress grouped by floor
    Overview {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Keep the overview on screen, refreshing periodically
    Watch {
        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
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
    /// Plain text output
    #[default]
    Plain,
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
    fn test_admin_action_debug() {
        let action = AdminAction::Reset { yes: true };
        let debug_str = format!("{action:?}");
        assert!(debug_str.contains("Reset"));
        assert!(debug_str.contains("yes"));
    }

    #[test]
    fn test_check_in_command_debug() {
        let cmd = CheckInCommand {
            room: "215".to_string(),
            format: OutputFormat::Json,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("215"));
    }
}
