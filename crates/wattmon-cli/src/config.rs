//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for persisted state
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Simulator tick period in seconds
    #[serde(default)]
    pub tick_interval: Option<u64>,
}

impl Config {
    /// Default config file path: `<config dir>/wattmon/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wattmon")
            .join("config.toml")
    }

    /// Load the default config file, falling back to defaults when it
    /// does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load a config file from an explicit path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load_from("/nonexistent/wattmon.toml").unwrap();
        assert!(config.data_dir.is_none());
        assert!(!config.no_color);
    }

    #[test]
    fn test_parse_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_dir = \"/tmp/wattmon\"\nno_color = true\ntick_interval = 10\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/wattmon")));
        assert!(config.no_color);
        assert_eq!(config.tick_interval, Some(10));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = [not toml").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
