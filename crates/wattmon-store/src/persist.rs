//! Persistence: commit sinks and key-value backends.
//!
//! The store itself is persistence-agnostic: it owns a [`CommitSink`] and
//! calls [`CommitSink::on_commit`] exactly once per committed mutation.
//! The JSON sink writes the three collections under stable keys, each
//! wrapped in a versioned envelope. Persistence is fire-and-forget:
//! failures are logged, never surfaced to the mutating caller.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use wattmon_types::{Device, Room, Template};

use crate::error::{Error, Result};

/// Storage key for the device collection.
pub const DEVICES_KEY: &str = "energy-devices";
/// Storage key for the room collection.
pub const ROOMS_KEY: &str = "energy-rooms";
/// Storage key for the template collection.
pub const TEMPLATES_KEY: &str = "energy-templates";

/// Version tag written into every stored payload.
pub const STORAGE_VERSION: u32 = 1;

/// Borrowed view of the store's persisted collections.
#[derive(Debug, Clone, Copy)]
pub struct StateSnapshot<'a> {
    pub devices: &'a [Device],
    pub rooms: &'a [Room],
    pub templates: &'a [Template],
}

/// Observer invoked after every committed mutation.
pub trait CommitSink: Send {
    /// Called once per committed mutation with the post-mutation state.
    fn on_commit(&mut self, state: &StateSnapshot<'_>);
}

/// Sink that drops every commit; for tests and ephemeral stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CommitSink for NullSink {
    fn on_commit(&mut self, _state: &StateSnapshot<'_>) {}
}

/// Minimal string key-value storage, the shape of a browser local store.
pub trait KeyValueStore: Send {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: String);
}

/// In-memory key-value store for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// File-backed key-value store: one `<key>.json` file per key.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| Error::CreateDirectory {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        debug!("Opening key-value store at {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Open the default data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_data_dir())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn put(&mut self, key: &str, value: String) {
        // Fire-and-forget contract: a failed write is logged, never surfaced.
        if let Err(e) = fs::write(self.path_for(key), value) {
            warn!("Failed to persist {}: {}", key, e);
        }
    }
}

#[derive(Serialize)]
struct VersionedPayloadRef<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
struct VersionedPayload<T> {
    #[allow(dead_code)]
    version: u32,
    items: Vec<T>,
}

/// Stored value shapes accepted on load: the current versioned envelope,
/// or a bare legacy array written before versioning existed.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPayload<T> {
    Versioned(VersionedPayload<T>),
    Legacy(Vec<T>),
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<Vec<T>> {
    match serde_json::from_str::<StoredPayload<T>>(raw) {
        Ok(StoredPayload::Versioned(payload)) => Some(payload.items),
        Ok(StoredPayload::Legacy(items)) => Some(items),
        Err(e) => {
            warn!("Discarding unreadable value under {}: {}", key, e);
            None
        }
    }
}

/// Commit sink that serializes state into a [`KeyValueStore`].
#[derive(Debug)]
pub struct JsonSink<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> JsonSink<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Take the backend back out of the sink.
    pub fn into_inner(self) -> S {
        self.backend
    }

    fn put_collection<T: Serialize>(&mut self, key: &str, items: &[T]) {
        match serde_json::to_string(&VersionedPayloadRef {
            version: STORAGE_VERSION,
            items,
        }) {
            Ok(raw) => self.backend.put(key, raw),
            Err(e) => warn!("Failed to serialize {}: {}", key, e),
        }
    }
}

impl<S: KeyValueStore> CommitSink for JsonSink<S> {
    fn on_commit(&mut self, state: &StateSnapshot<'_>) {
        self.put_collection(DEVICES_KEY, state.devices);
        self.put_collection(ROOMS_KEY, state.rooms);
        self.put_collection(TEMPLATES_KEY, state.templates);
    }
}

/// Collections read back from a key-value store.
///
/// `None` means the key was missing or its value unreadable.
#[derive(Debug, Default)]
pub struct LoadedCollections {
    pub devices: Option<Vec<Device>>,
    pub rooms: Option<Vec<Room>>,
    pub templates: Option<Vec<Template>>,
}

/// Read the persisted collections out of a backend.
pub fn load_collections<S: KeyValueStore>(backend: &S) -> LoadedCollections {
    LoadedCollections {
        devices: backend
            .get(DEVICES_KEY)
            .and_then(|raw| decode(DEVICES_KEY, &raw)),
        rooms: backend
            .get(ROOMS_KEY)
            .and_then(|raw| decode(ROOMS_KEY, &raw)),
        templates: backend
            .get(TEMPLATES_KEY)
            .and_then(|raw| decode(TEMPLATES_KEY, &raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wattmon_types::{DeviceId, DeviceKind, DeviceStatus, RoomId, RoomStatus};

    fn sample_device() -> Device {
        Device {
            id: DeviceId::from("d1"),
            name: "Lamp".to_string(),
            kind: DeviceKind::Light,
            room_id: RoomId::from("r1"),
            status: DeviceStatus::On,
            power: 240,
            max_power: 300,
        }
    }

    fn sample_room() -> Room {
        Room {
            id: RoomId::from("r1"),
            name: "Lab A".to_string(),
            building: "Bldg1".to_string(),
            enabled: true,
            devices_on: 1,
            total_devices: 1,
            consumption: 0.2,
            status: RoomStatus::Normal,
        }
    }

    #[test]
    fn test_commit_then_load_roundtrip() {
        let mut sink = JsonSink::new(MemoryKeyValueStore::new());
        let devices = vec![sample_device()];
        let rooms = vec![sample_room()];
        let templates = Vec::new();
        sink.on_commit(&StateSnapshot {
            devices: &devices,
            rooms: &rooms,
            templates: &templates,
        });

        let backend = sink.into_inner();
        let loaded = load_collections(&backend);
        assert_eq!(loaded.devices.unwrap(), devices);
        assert_eq!(loaded.rooms.unwrap(), rooms);
        assert_eq!(loaded.templates.unwrap(), templates);
    }

    #[test]
    fn test_written_values_carry_version_tag() {
        let mut sink = JsonSink::new(MemoryKeyValueStore::new());
        sink.on_commit(&StateSnapshot {
            devices: &[],
            rooms: &[],
            templates: &[],
        });
        let backend = sink.into_inner();
        let raw = backend.get(DEVICES_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], STORAGE_VERSION);
        assert!(value["items"].is_array());
    }

    #[test]
    fn test_legacy_bare_arrays_are_accepted() {
        let mut backend = MemoryKeyValueStore::new();
        let raw = serde_json::to_string(&vec![sample_room()]).unwrap();
        backend.put(ROOMS_KEY, raw);

        let loaded = load_collections(&backend);
        assert_eq!(loaded.rooms.unwrap(), vec![sample_room()]);
        assert!(loaded.devices.is_none());
    }

    #[test]
    fn test_unreadable_value_loads_as_none() {
        let mut backend = MemoryKeyValueStore::new();
        backend.put(DEVICES_KEY, "{not json".to_string());
        let loaded = load_collections(&backend);
        assert!(loaded.devices.is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileKeyValueStore::open(dir.path().join("nested")).unwrap();
        assert!(store.get("missing").is_none());

        store.put("energy-devices", "[]".to_string());
        assert_eq!(store.get("energy-devices").unwrap(), "[]");
        assert!(dir.path().join("nested/energy-devices.json").exists());
    }
}
