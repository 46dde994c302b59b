//! Status command implementation.

use anyhow::Result;

use wattmon_store::EnergyStore;

use crate::cli::OutputFormat;
use crate::format::{self, FormatOptions};

pub fn cmd_status(store: &EnergyStore, format: OutputFormat, opts: &FormatOptions) -> Result<()> {
    let stats = store.stats();
    match format {
        OutputFormat::Json => println!("{}", format::stats_json(&stats)?),
        OutputFormat::Text => print!("{}", format::stats_text(&stats, opts)),
    }
    Ok(())
}
