//! Configuration management for Gamepad TestKit
//!
//! Persistent configuration saved to and loaded from a platform-specific
//! config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/gamepad-testkit/config.toml` |
//! | macOS | `~/Library/Application Support/gamepad-testkit/config.toml` |
//! | Windows | `%APPDATA%\gamepad-testkit\config.toml` |

use crate::detect::DetectionMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file, creating the config directory if
/// it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("gamepad-testkit");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Polling measurement settings
    pub polling: PollingConfig,
    /// Stick circularity analysis settings
    pub circularity: CircularityConfig,
    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Polling measurement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Rolling-window capacity for live statistics
    pub window_capacity: usize,
    /// Append-log cap; the session completes when it fills
    pub sample_cap: usize,
    /// Sleep quantum between poll iterations, in microseconds.
    /// Trades CPU usage against timing resolution.
    pub poll_sleep_us: u64,
    /// Wall-time cadence of statistics snapshots, in milliseconds
    pub report_interval_ms: u64,
    /// Change-detection mode
    pub mode: DetectionMode,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            window_capacity: 1000,
            sample_cap: 10_000,
            poll_sleep_us: 100,
            report_interval_ms: 50,
            mode: DetectionMode::Standard,
        }
    }
}

impl PollingConfig {
    pub fn poll_sleep(&self) -> Duration {
        Duration::from_micros(self.poll_sleep_us)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

/// Stick circularity analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularityConfig {
    /// Number of angular sectors covering the full circle
    pub sectors: usize,
    /// Capacity of the recent-radius window behind the error metric
    pub radius_window: usize,
}

impl Default for CircularityConfig {
    fn default() -> Self {
        Self {
            sectors: crate::circularity::DEFAULT_SECTORS,
            radius_window: crate::circularity::DEFAULT_RADIUS_WINDOW,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Write a report file when a session reaches a terminal state
    pub auto_save: bool,
    /// Report directory; the current working directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            output_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("gamepad-testkit-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.polling.window_capacity, 1000);
        assert_eq!(config.polling.sample_cap, 10_000);
        assert_eq!(config.polling.poll_sleep_us, 100);
        assert_eq!(config.polling.report_interval_ms, 50);
        assert_eq!(config.polling.mode, DetectionMode::Standard);
        assert_eq!(config.circularity.sectors, 24);
        assert_eq!(config.circularity.radius_window, 5000);
        assert!(config.report.auto_save);
        assert_eq!(config.report.output_dir, None);
    }

    #[test]
    fn polling_durations() {
        let config = PollingConfig::default();
        assert_eq!(config.poll_sleep(), Duration::from_micros(100));
        assert_eq!(config.report_interval(), Duration::from_millis(50));
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.polling.sample_cap = 2000;
        config.polling.mode = DetectionMode::Extended;
        config.circularity.sectors = 36;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.polling.sample_cap, 2000);
        assert_eq!(loaded.polling.mode, DetectionMode::Extended);
        assert_eq!(loaded.circularity.sectors, 36);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[polling]"));
        assert!(toml_str.contains("[circularity]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("window_capacity = 1000"));
        assert!(toml_str.contains("mode = \"Standard\""));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[polling]
window_capacity = 4000
sample_cap = 20000
poll_sleep_us = 250
report_interval_ms = 100
mode = "Extended"

[circularity]
sectors = 16
radius_window = 1000
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.polling.window_capacity, 4000);
        assert_eq!(config.polling.sample_cap, 20_000);
        assert_eq!(config.polling.poll_sleep_us, 250);
        assert_eq!(config.polling.report_interval_ms, 100);
        assert_eq!(config.polling.mode, DetectionMode::Extended);
        assert_eq!(config.circularity.sectors, 16);
        assert_eq!(config.circularity.radius_window, 1000);
        // Missing [report] section falls back to defaults
        assert!(config.report.auto_save);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }

    #[test]
    fn config_path_points_into_app_dir() {
        let result = config_path();
        assert!(result.is_ok());

        let path = result.unwrap();
        assert!(path.to_string_lossy().contains("gamepad-testkit"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
