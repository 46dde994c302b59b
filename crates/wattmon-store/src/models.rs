//! Input and transfer models for store operations.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use wattmon_types::{Device, DeviceBlueprint, DeviceKind, DeviceStatus, Room, RoomId, Template};

/// Fields for creating a room; derived fields start zeroed.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub name: String,
    pub building: String,
    pub enabled: bool,
}

/// Partial update of a room's operator-owned fields.
///
/// Derived fields are owned by the store's recomputation and cannot be
/// patched directly.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub building: Option<String>,
    pub enabled: Option<bool>,
}

/// Fields for creating a device.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub kind: DeviceKind,
    pub room_id: RoomId,
    pub status: DeviceStatus,
    pub power: u32,
    pub max_power: u32,
}

/// Partial update of a device.
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub kind: Option<DeviceKind>,
    pub room_id: Option<RoomId>,
    pub status: Option<DeviceStatus>,
    pub power: Option<u32>,
    pub max_power: Option<u32>,
}

/// Fields for creating a template.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub devices: Vec<DeviceBlueprint>,
}

/// Full-state export payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub devices: Vec<Device>,
    pub rooms: Vec<Room>,
    pub templates: Vec<Template>,
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
}

/// Bulk import payload.
///
/// Absent collections leave the corresponding store state untouched;
/// unknown keys (such as `exportedAt` from an export bundle) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportPayload {
    #[serde(default)]
    pub devices: Option<Vec<Device>>,
    #[serde(default)]
    pub rooms: Option<Vec<Room>>,
    #[serde(default)]
    pub templates: Option<Vec<Template>>,
}
