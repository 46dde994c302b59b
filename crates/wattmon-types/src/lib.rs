//! Platform-agnostic types for wattmon energy monitoring.
//!
//! This crate provides the shared data model used by the store
//! (wattmon-store) and the command-line front end (wattmon-cli).
//!
//! # Features
//!
//! - Device, room, template, and alert records
//! - Tagged device kinds (AC units carry a temperature setpoint)
//! - Status enums with lowercase wire representations
//! - Opaque id newtypes backed by UUIDs
//! - Derived statistics and chart series points
//!
//! # Example
//!
//! ```
//! use wattmon_types::{DeviceKind, DeviceStatus, RoomStatus};
//!
//! let kind = DeviceKind::from_label("ac");
//! assert_eq!(kind.temperature(), Some(24));
//! assert!(DeviceStatus::On.is_on());
//! assert!(RoomStatus::Alert > RoomStatus::Normal);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    Alert, AlertKind, ConsumptionPoint, DEFAULT_LOAD_FACTOR, Device, DeviceBlueprint, DeviceId,
    DeviceKind, DeviceStatus, Room, RoomId, RoomStatus, Stats, Template, TemplateId, default_draw,
};
