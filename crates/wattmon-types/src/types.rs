//! Core types for wattmon energy monitoring data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use time::OffsetDateTime;

use crate::error::ParseError;

/// Fraction of capacity a device draws when switched on without an
/// explicit power assignment.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.8;

/// Power draw in watts for a device switched on at the default load factor.
///
/// # Examples
///
/// ```
/// use wattmon_types::default_draw;
///
/// assert_eq!(default_draw(1500), 1200);
/// assert_eq!(default_draw(300), 240);
/// ```
#[must_use]
pub fn default_draw(max_power: u32) -> u32 {
    (f64::from(max_power) * DEFAULT_LOAD_FACTOR).round() as u32
}

/// Opaque identifier for a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DeviceId(String);

impl DeviceId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// View the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque identifier for a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoomId(String);

impl RoomId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// View the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque identifier for a device template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TemplateId(String);

impl TemplateId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// View the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Operating status of a device.
///
/// `Offline` devices are present in the inventory but unreachable; they
/// draw no power and do not count as active.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new states
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum DeviceStatus {
    /// Device is switched on and drawing power.
    On,
    /// Device is switched off.
    Off,
    /// Device is unreachable.
    Offline,
}

impl DeviceStatus {
    /// Whether the device is actively drawing power.
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, DeviceStatus::On)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::On => write!(f, "on"),
            DeviceStatus::Off => write!(f, "off"),
            DeviceStatus::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" => Ok(DeviceStatus::On),
            "off" => Ok(DeviceStatus::Off),
            "offline" => Ok(DeviceStatus::Offline),
            other => Err(ParseError::InvalidDeviceStatus(other.to_string())),
        }
    }
}

/// Room consumption classification.
///
/// # Ordering
///
/// Status values are ordered by severity: `Normal < Warning < Alert`.
/// This allows threshold comparisons like
/// `if status >= RoomStatus::Warning { warn!(...) }`.
///
/// ```
/// use wattmon_types::RoomStatus;
///
/// assert!(RoomStatus::Alert > RoomStatus::Warning);
/// assert!(RoomStatus::Warning > RoomStatus::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
#[repr(u8)]
pub enum RoomStatus {
    /// Consumption within the normal band.
    Normal = 0,
    /// Consumption above the warning threshold.
    Warning = 1,
    /// Consumption above the alert threshold.
    Alert = 2,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomStatus::Normal => write!(f, "normal"),
            RoomStatus::Warning => write!(f, "warning"),
            RoomStatus::Alert => write!(f, "alert"),
        }
    }
}

impl FromStr for RoomStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(RoomStatus::Normal),
            "warning" => Ok(RoomStatus::Warning),
            "alert" => Ok(RoomStatus::Alert),
            other => Err(ParseError::InvalidRoomStatus(other.to_string())),
        }
    }
}

/// Kind of controllable load.
///
/// Air-conditioning units carry a temperature setpoint; no other kind
/// does, so the setpoint lives on the `Ac` variant rather than as an
/// optional field shared by every device.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new kinds
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
#[non_exhaustive]
pub enum DeviceKind {
    /// Air conditioning unit.
    Ac {
        /// Target temperature in degrees Celsius.
        temperature: i32,
    },
    /// Lighting fixture or panel.
    Light,
    /// Projector.
    Projector,
    /// Workstation or lab computer.
    Computer,
    /// Anything else: sound systems, lab instruments, fans.
    Other,
}

impl DeviceKind {
    /// Temperature setpoint assigned to AC units created from a bare label.
    pub const DEFAULT_AC_SETPOINT: i32 = 24;

    /// Detect a device kind from a free-form label.
    ///
    /// CSV imports and operator input carry human-readable type labels;
    /// matching is case-insensitive and anything unrecognized maps to
    /// [`DeviceKind::Other`]. AC units get the default setpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use wattmon_types::DeviceKind;
    ///
    /// assert_eq!(DeviceKind::from_label("Light"), DeviceKind::Light);
    /// assert_eq!(
    ///     DeviceKind::from_label("AC"),
    ///     DeviceKind::Ac { temperature: DeviceKind::DEFAULT_AC_SETPOINT },
    /// );
    /// assert_eq!(DeviceKind::from_label("Sound System"), DeviceKind::Other);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "ac" => DeviceKind::Ac {
                temperature: Self::DEFAULT_AC_SETPOINT,
            },
            "light" => DeviceKind::Light,
            "projector" => DeviceKind::Projector,
            "computer" => DeviceKind::Computer,
            _ => DeviceKind::Other,
        }
    }

    /// Canonical label for this kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Ac { .. } => "AC",
            DeviceKind::Light => "Light",
            DeviceKind::Projector => "Projector",
            DeviceKind::Computer => "Computer",
            DeviceKind::Other => "Other",
        }
    }

    /// Temperature setpoint, present only for AC units.
    #[must_use]
    pub fn temperature(&self) -> Option<i32> {
        match self {
            DeviceKind::Ac { temperature } => Some(*temperature),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single controllable load, owned by exactly one room.
///
/// Rooms own devices through the `room_id` foreign key; a device whose
/// room is deleted is deleted with it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: DeviceKind,
    pub room_id: RoomId,
    pub status: DeviceStatus,
    /// Current draw in watts.
    pub power: u32,
    /// Capacity in watts.
    pub max_power: u32,
}

impl Device {
    /// Watts this device contributes to its room's consumption.
    #[must_use]
    pub fn active_draw(&self) -> u32 {
        if self.status.is_on() { self.power } else { 0 }
    }
}

/// A named physical space aggregating zero or more devices.
///
/// `devices_on`, `total_devices`, `consumption`, and `status` are derived
/// by the store's recomputation; mutate them only through store operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub building: String,
    /// Master switch for the whole room.
    pub enabled: bool,
    /// Count of devices currently on (derived).
    pub devices_on: u32,
    /// Count of devices owned by this room (derived).
    pub total_devices: u32,
    /// Live consumption in kWh, rounded to one decimal (derived).
    pub consumption: f64,
    /// Classification of `consumption` (derived).
    pub status: RoomStatus,
}

/// A device minus its identity and room binding, as carried by templates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeviceBlueprint {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    pub power: u32,
    pub max_power: u32,
}

/// A named, reusable bundle of device blueprints applied to a target room
/// in one batch operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub devices: Vec<DeviceBlueprint>,
}

/// Severity of an alert record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum AlertKind {
    /// Needs operator attention.
    Warning,
    /// Something went wrong.
    Error,
    /// Acknowledged and closed.
    Resolved,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Warning => write!(f, "warning"),
            AlertKind::Error => write!(f, "error"),
            AlertKind::Resolved => write!(f, "resolved"),
        }
    }
}

/// An operator-visible alert record.
///
/// Alerts are a separate mutable collection: they are not derived from
/// device state and are not persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Alert {
    pub id: u64,
    pub message: String,
    pub kind: AlertKind,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub raised_at: OffsetDateTime,
    pub location: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub device_id: Option<DeviceId>,
}

/// Derived aggregate over all rooms and devices.
///
/// Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Stats {
    /// Sum of enabled rooms' consumption, kWh.
    pub total_consumption: f64,
    /// Highest single-room consumption, kWh (0 when there are no rooms).
    pub peak_load: f64,
    /// Devices currently on.
    pub active_devices: u32,
    /// Devices in the inventory.
    pub total_devices: u32,
    /// Percentage of devices currently on, rounded.
    pub efficiency: u32,
    /// Estimated cost savings, millions of currency units.
    pub cost_savings: f64,
    /// Estimated CO2 reduction in kilograms.
    pub carbon_reduction: i64,
    /// Current alert records.
    pub alerts: Vec<Alert>,
}

/// One point on a consumption chart series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConsumptionPoint {
    /// Point label: a clock time for realtime series, a weekday for weekly.
    pub time: String,
    /// Consumption in watts for realtime series, kWh for weekly.
    pub consumption: f64,
    /// Efficiency percentage at this point.
    pub efficiency: u32,
}
