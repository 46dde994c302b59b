//! Error types for wattmon-store.

use std::path::PathBuf;

/// Result type for wattmon-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wattmon-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to create the data directory.
    #[error("Failed to create data directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Bulk import payload was not valid JSON.
    #[error("Invalid JSON data format")]
    InvalidImport(#[source] serde_json::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
