//! Bulk import and export commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use wattmon_store::EnergyStore;

use crate::cli::ImportCommand;
use crate::format;

pub fn cmd_import(store: &mut EnergyStore, command: ImportCommand) -> Result<()> {
    match command {
        ImportCommand::Csv { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = store.import_devices_csv(&text);
            println!("{}", format::import_report_text(&report));
        }
        ImportCommand::Json { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            store
                .import_all(&text)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!(
                "Imported state: {} rooms, {} devices, {} templates",
                store.rooms().len(),
                store.devices().len(),
                store.templates().len()
            );
        }
    }
    Ok(())
}

pub fn cmd_export(store: &EnergyStore, output: Option<&PathBuf>) -> Result<()> {
    let json = store.export_all().context("Failed to export state")?;
    format::write_output(output, &json)
}
