//! Aggregate state store for wattmon energy monitoring.
//!
//! This crate owns the authoritative in-memory collections of devices,
//! rooms, and templates, recomputes derived statistics and per-room
//! consumption on every mutation, and persists the collections through an
//! injected commit sink.
//!
//! # Features
//!
//! - Synchronous CRUD over devices, rooms, and templates
//! - Eager per-room recomputation of derived fields on every mutation
//! - CSV device import with per-row errors and explicit partial success
//! - Full-state JSON export/import
//! - Versioned JSON persistence over pluggable key-value backends
//! - Cancelable background power perturbation (sensor-noise simulation)
//!
//! # Example
//!
//! ```no_run
//! use wattmon_store::{EnergyStore, FileKeyValueStore};
//! use wattmon_types::DeviceStatus;
//!
//! let backend = FileKeyValueStore::open_default()?;
//! let mut store = EnergyStore::load(backend);
//!
//! let lamp = store.devices()[0].id.clone();
//! store.set_device_status(&lamp, DeviceStatus::Off);
//! println!("total: {} kWh", store.stats().total_consumption);
//! # Ok::<(), wattmon_store::Error>(())
//! ```

mod csv;
mod error;
pub mod models;
mod persist;
mod seed;
mod series;
mod simulator;
mod stats;
mod store;
mod thresholds;

pub use csv::ImportReport;
pub use error::{Error, Result};
pub use persist::{
    CommitSink, DEVICES_KEY, FileKeyValueStore, JsonSink, KeyValueStore, LoadedCollections,
    MemoryKeyValueStore, NullSink, ROOMS_KEY, STORAGE_VERSION, StateSnapshot, TEMPLATES_KEY,
    load_collections,
};
pub use series::ConsumptionSeries;
pub use simulator::{DEFAULT_TICK_PERIOD, Simulator};
pub use store::EnergyStore;
pub use thresholds::{ThresholdConfig, Thresholds};

/// Default data directory following platform conventions.
///
/// - Linux: `~/.local/share/wattmon`
/// - macOS: `~/Library/Application Support/wattmon`
/// - Windows: `C:\Users\<user>\AppData\Local\wattmon`
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("wattmon")
}
