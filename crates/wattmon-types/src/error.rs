//! Error types for parsing wattmon labels.

use thiserror::Error;

/// Errors that can occur when parsing wattmon enum labels.
///
/// This error type is platform-agnostic and does not include storage
/// or I/O errors (those belong in wattmon-store).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Device status label was not `on`, `off`, or `offline`.
    #[error("invalid device status: {0}")]
    InvalidDeviceStatus(String),

    /// Room status label was not `normal`, `warning`, or `alert`.
    #[error("invalid room status: {0}")]
    InvalidRoomStatus(String),
}

/// Result type alias using wattmon-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
