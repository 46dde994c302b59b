//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "wattmon")]
#[command(author, version, about = "Energy monitoring administration CLI", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Data directory for persisted state
    #[arg(long, global = true, env = "WATTMON_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show aggregate statistics and alerts
    Status {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Inspect and manage rooms
    Rooms {
        #[command(subcommand)]
        command: RoomsCommand,
    },

    /// Inspect and control devices
    Devices {
        #[command(subcommand)]
        command: DevicesCommand,
    },

    /// List and apply device templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },

    /// Import devices from CSV or replace state from a JSON bundle
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },

    /// Export the full state as JSON
    Export {
        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the background simulator, printing stats each tick
    Watch {
        /// Tick period in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Reset the store to the built-in seed dataset
    Seed,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms with derived aggregates
    List,

    /// Add a room
    Add {
        /// Room name
        name: String,

        /// Building the room belongs to
        #[arg(short, long)]
        building: String,

        /// Create the room with its master switch off
        #[arg(long)]
        disabled: bool,
    },

    /// Delete a room and every device it owns
    Rm {
        /// Room id
        id: String,
    },

    /// Flip a room's master switch
    Toggle {
        /// Room id
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices, optionally scoped to one room
    List {
        /// Only devices owned by this room id
        #[arg(short, long)]
        room: Option<String>,
    },

    /// Switch a device on
    On {
        /// Device id
        id: String,
    },

    /// Switch a device off
    Off {
        /// Device id
        id: String,
    },

    /// Set a device's draw in watts
    SetPower {
        /// Device id
        id: String,

        /// Draw in watts
        watts: u32,
    },

    /// Add a device to a room
    Add {
        /// Device name
        name: String,

        /// Owning room id
        #[arg(short, long)]
        room: String,

        /// Device type label (AC, Light, Projector, Computer, ...)
        #[arg(short, long, default_value = "Other")]
        kind: String,

        /// Capacity in watts
        #[arg(short, long)]
        max_power: u32,

        /// Create the device switched on
        #[arg(long)]
        on: bool,
    },

    /// Delete a device
    Rm {
        /// Device id
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// List templates and their blueprints
    List,

    /// Expand a template into a room
    Apply {
        /// Template id
        template: String,

        /// Target room id
        #[arg(short, long)]
        room: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import devices from a CSV file
    Csv {
        /// CSV file path
        file: PathBuf,
    },

    /// Replace collections from a JSON bundle
    Json {
        /// JSON file path
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_device_add_defaults() {
        let cli = Cli::parse_from([
            "wattmon", "devices", "add", "Lamp", "--room", "r1", "--max-power", "300",
        ]);
        match cli.command {
            Commands::Devices {
                command:
                    DevicesCommand::Add {
                        name,
                        kind,
                        on,
                        max_power,
                        ..
                    },
            } => {
                assert_eq!(name, "Lamp");
                assert_eq!(kind, "Other");
                assert_eq!(max_power, 300);
                assert!(!on);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
