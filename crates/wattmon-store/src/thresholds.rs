//! Room consumption thresholds and classification.
//!
//! This module provides configurable thresholds for classifying a room's
//! live consumption into its status band.
//!
//! # Example
//!
//! ```
//! use wattmon_store::Thresholds;
//! use wattmon_types::RoomStatus;
//!
//! let thresholds = Thresholds::default();
//! assert_eq!(thresholds.classify(4.2), RoomStatus::Normal);
//! assert_eq!(thresholds.classify(8.5), RoomStatus::Warning);
//! assert_eq!(thresholds.classify(12.4), RoomStatus::Alert);
//! ```

use serde::{Deserialize, Serialize};

use wattmon_types::RoomStatus;

/// Configuration for room consumption thresholds, in kWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Consumption strictly above this is at least a warning.
    pub warning_above: f64,
    /// Consumption strictly above this is an alert.
    pub alert_above: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warning_above: 7.0,
            alert_above: 10.0,
        }
    }
}

/// Threshold evaluator for room consumption readings.
#[derive(Debug, Clone, Default)]
pub struct Thresholds {
    config: ThresholdConfig,
}

impl Thresholds {
    /// Create a new threshold evaluator with the given configuration.
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Classify a consumption reading in kWh.
    pub fn classify(&self, kwh: f64) -> RoomStatus {
        if kwh > self.config.alert_above {
            RoomStatus::Alert
        } else if kwh > self.config.warning_above {
            RoomStatus::Warning
        } else {
            RoomStatus::Normal
        }
    }
}
