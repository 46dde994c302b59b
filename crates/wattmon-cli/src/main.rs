//! wattmon: energy monitoring administration CLI.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wattmon_store::{DEFAULT_TICK_PERIOD, EnergyStore, FileKeyValueStore};

mod cli;
mod commands;
mod config;
mod format;

use cli::{Cli, Commands};
use config::Config;
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let opts = FormatOptions {
        no_color: cli.no_color || config.no_color,
    };

    let data_dir = cli
        .data_dir
        .or(config.data_dir)
        .unwrap_or_else(wattmon_store::default_data_dir);
    let backend = FileKeyValueStore::open(&data_dir)?;
    let mut store = EnergyStore::load(backend);

    match cli.command {
        Commands::Status { format } => commands::cmd_status(&store, format, &opts)?,
        Commands::Rooms { command } => commands::cmd_rooms(&mut store, command, &opts)?,
        Commands::Devices { command } => commands::cmd_devices(&mut store, command, &opts)?,
        Commands::Templates { command } => commands::cmd_templates(&mut store, command)?,
        Commands::Import { command } => commands::cmd_import(&mut store, command)?,
        Commands::Export { output } => commands::cmd_export(&store, output.as_ref())?,
        Commands::Watch { interval } => {
            let period = interval
                .or(config.tick_interval)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TICK_PERIOD);
            commands::cmd_watch(store, period).await?;
        }
        Commands::Seed => {
            store.reset_to_seed();
            println!(
                "Store reset to seed data ({} rooms, {} devices, {} templates)",
                store.rooms().len(),
                store.devices().len(),
                store.templates().len()
            );
        }
    }

    Ok(())
}
