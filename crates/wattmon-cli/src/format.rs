//! Output formatting utilities for text and JSON output.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tabled::Table;
use tabled::Tabled;
use tabled::settings::Style;

use wattmon_store::ImportReport;
use wattmon_types::{Alert, AlertKind, Device, DeviceStatus, Room, RoomStatus, Stats, Template};

/// Formatting options for command output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
}

/// Color a room status by severity.
pub fn format_room_status(status: RoomStatus, no_color: bool) -> String {
    if no_color {
        return status.to_string();
    }
    match status {
        RoomStatus::Normal => status.to_string().green().to_string(),
        RoomStatus::Warning => status.to_string().yellow().to_string(),
        RoomStatus::Alert => status.to_string().red().to_string(),
        _ => status.to_string(),
    }
}

/// Color a device status.
pub fn format_device_status(status: DeviceStatus, no_color: bool) -> String {
    if no_color {
        return status.to_string();
    }
    match status {
        DeviceStatus::On => status.to_string().green().to_string(),
        DeviceStatus::Off => status.to_string().dimmed().to_string(),
        DeviceStatus::Offline => status.to_string().red().to_string(),
        _ => status.to_string(),
    }
}

fn format_alert_kind(kind: AlertKind, no_color: bool) -> String {
    if no_color {
        return kind.to_string();
    }
    match kind {
        AlertKind::Warning => kind.to_string().yellow().to_string(),
        AlertKind::Error => kind.to_string().red().to_string(),
        AlertKind::Resolved => kind.to_string().dimmed().to_string(),
        _ => kind.to_string(),
    }
}

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Building")]
    building: String,
    #[tabled(rename = "Master")]
    master: String,
    #[tabled(rename = "Devices")]
    devices: String,
    #[tabled(rename = "Consumption")]
    consumption: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Render rooms as a table.
pub fn rooms_table(rooms: &[Room], opts: &FormatOptions) -> String {
    let rows: Vec<RoomRow> = rooms
        .iter()
        .map(|room| RoomRow {
            id: room.id.to_string(),
            name: room.name.clone(),
            building: room.building.clone(),
            master: if room.enabled { "on" } else { "off" }.to_string(),
            devices: format!("{}/{}", room.devices_on, room.total_devices),
            consumption: format!("{:.1} kWh", room.consumption),
            status: format_room_status(room.status, opts.no_color),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Power")]
    power: String,
}

/// Render devices as a table.
pub fn devices_table(devices: &[Device], opts: &FormatOptions) -> String {
    let rows: Vec<DeviceRow> = devices
        .iter()
        .map(|device| DeviceRow {
            id: device.id.to_string(),
            name: device.name.clone(),
            kind: match device.kind.temperature() {
                Some(setpoint) => format!("{} ({setpoint}C)", device.kind),
                None => device.kind.to_string(),
            },
            room: device.room_id.to_string(),
            status: format_device_status(device.status, opts.no_color),
            power: format!("{}/{} W", device.power, device.max_power),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

/// Render templates as a table.
pub fn templates_table(templates: &[Template]) -> String {
    let rows: Vec<TemplateRow> = templates
        .iter()
        .map(|template| TemplateRow {
            id: template.id.to_string(),
            name: template.name.clone(),
            description: template.description.clone(),
            devices: template.devices.len(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Multi-line statistics summary.
pub fn stats_text(stats: &Stats, opts: &FormatOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total consumption: {:.1} kWh (peak room {:.1} kWh)\n",
        stats.total_consumption, stats.peak_load
    ));
    out.push_str(&format!(
        "Devices: {}/{} on ({}% efficiency)\n",
        stats.active_devices, stats.total_devices, stats.efficiency
    ));
    out.push_str(&format!(
        "Savings: {:.1}M | CO2 reduction: {} kg\n",
        stats.cost_savings, stats.carbon_reduction
    ));
    if stats.alerts.is_empty() {
        out.push_str("No alerts\n");
    } else {
        out.push_str(&format!("Alerts ({}):\n", stats.alerts.len()));
        for alert in &stats.alerts {
            out.push_str(&format_alert(alert, opts));
            out.push('\n');
        }
    }
    out
}

fn format_alert(alert: &Alert, opts: &FormatOptions) -> String {
    format!(
        "  [{}] {} - {} ({})",
        format_alert_kind(alert.kind, opts.no_color),
        alert.message,
        alert.location,
        alert.raised_at,
    )
}

/// One-line statistics summary for watch output.
pub fn stats_line(stats: &Stats) -> String {
    format!(
        "{:.1} kWh total | peak {:.1} kWh | {}/{} on | {}% efficiency",
        stats.total_consumption,
        stats.peak_load,
        stats.active_devices,
        stats.total_devices,
        stats.efficiency
    )
}

/// Statistics as pretty-printed JSON.
pub fn stats_json(stats: &Stats) -> Result<String> {
    serde_json::to_string_pretty(stats).context("Failed to serialize statistics")
}

/// Human-readable CSV import outcome.
pub fn import_report_text(report: &ImportReport) -> String {
    let mut out = format!("Imported {} device(s)", report.success);
    if !report.errors.is_empty() {
        out.push_str(&format!(", {} row(s) failed:", report.errors.len()));
        for error in &report.errors {
            out.push_str(&format!("\n  {error}"));
        }
    }
    out
}

/// Write content to a file, or stdout when no path is given.
pub fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
