//! Device import from comma-separated text.
//!
//! The import format is deliberately plain: a required header row with the
//! columns `name,type,room,building,maxPower,status` in any order
//! (case-insensitive), one device per subsequent row, values split on
//! commas with no quoting or escaping. Rows fail individually; a bad row
//! never aborts the batch.

use std::collections::HashMap;

use wattmon_types::{Device, DeviceId, DeviceKind, DeviceStatus, Room, default_draw};

/// Columns that must be present in the header row.
const REQUIRED_COLUMNS: [&str; 6] = ["name", "type", "room", "building", "maxpower", "status"];

/// Outcome of a CSV device import.
///
/// Partial success is explicit: `success` counts accepted rows while
/// `errors` carries one human-readable message per failed line, keyed by
/// 1-based line number (header included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of rows accepted.
    pub success: usize,
    /// Per-line error messages.
    pub errors: Vec<String>,
}

/// Parse CSV text into devices bound to existing rooms.
///
/// Room references in the text are human-readable `(room, building)` name
/// pairs; they resolve against `rooms`, and a row naming an unknown room
/// fails with a per-line error instead of producing a device with a
/// dangling reference.
pub(crate) fn parse_devices(text: &str, rooms: &[Room]) -> (Vec<Device>, ImportReport) {
    let mut devices = Vec::new();
    let mut errors = Vec::new();

    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 2 {
        return (
            devices,
            ImportReport {
                success: 0,
                errors: vec!["CSV file is empty or invalid".to_string()],
            },
        );
    }

    let headers: Vec<String> = lines[0]
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect();
    if !missing.is_empty() {
        return (
            devices,
            ImportReport {
                success: 0,
                errors: vec![format!("Missing required columns: {}", missing.join(", "))],
            },
        );
    }

    for (index, raw_line) in lines.iter().enumerate().skip(1) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect();
        let field = |name: &str| row.get(name).copied().unwrap_or("");

        let max_power = match field("maxpower").parse::<i64>() {
            Ok(value) if value > 0 => value as u32,
            _ => {
                errors.push(format!("Line {line_no}: Invalid maxPower value"));
                continue;
            }
        };

        let status = match field("status").parse::<DeviceStatus>() {
            Ok(status @ (DeviceStatus::On | DeviceStatus::Off)) => status,
            _ => {
                errors.push(format!("Line {line_no}: Status must be 'on' or 'off'"));
                continue;
            }
        };

        let room_name = field("room");
        let building = field("building");
        let Some(room) = rooms
            .iter()
            .find(|r| r.name == room_name && r.building == building)
        else {
            errors.push(format!(
                "Line {line_no}: Unknown room '{room_name}' in building '{building}'"
            ));
            continue;
        };

        devices.push(Device {
            id: DeviceId::fresh(),
            name: field("name").to_string(),
            kind: DeviceKind::from_label(field("type")),
            room_id: room.id.clone(),
            status,
            power: if status.is_on() {
                default_draw(max_power)
            } else {
                0
            },
            max_power,
        });
    }

    let success = devices.len();
    (devices, ImportReport { success, errors })
}
