//! Configuration for the teleop console
//!
//! Loads configuration from a TOML file with the minimal parameters needed
//! to reach the robot and drive it: network addresses, control tuning, and
//! the capture output location.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub control: ControlConfig,
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

/// Network configuration (robot addresses)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Robot command uplink address (operator connects, commands flow out)
    ///
    /// Example: `192.168.178.40:5556`
    pub command_address: String,

    /// Robot frame downlink address (operator connects, frames flow in)
    ///
    /// Example: `192.168.178.40:6665`
    pub frame_address: String,
}

/// Control tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Base speed magnitude in motor units before the factor keys apply.
    ///
    /// Effective speed is `factor * base_speed`, negated for forward per
    /// the robot's sign convention.
    pub base_speed: i32,

    /// Keyboard polling interval in milliseconds.
    ///
    /// Must stay well under 100ms end-to-end for acceptable teleoperation.
    pub poll_interval_ms: u64,
}

/// Dataset capture configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Directory where captured frames are written as `<n>.jpg`
    pub output_dir: String,

    /// Minimum milliseconds between two captures.
    ///
    /// One physical key press spans many polling iterations; without a
    /// debounce a single press would produce a burst of duplicate files.
    pub debounce_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    pub level: String,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this TOML file
    File(String),
    /// No config file present; built-in defaults in effect
    BuiltinDefaults,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve configuration from an explicitly passed path or the default.
    ///
    /// An explicitly passed path must exist and parse; a typo must not
    /// quietly retarget the console at the built-in addresses. Only the
    /// implicit default path may fall back to [`home_defaults`](Self::home_defaults)
    /// when absent.
    pub fn resolve(explicit: Option<&str>, default_path: &str) -> Result<(Self, ConfigSource)> {
        match explicit {
            Some(path) => Ok((Self::from_file(path)?, ConfigSource::File(path.to_string()))),
            None if Path::new(default_path).exists() => Ok((
                Self::from_file(default_path)?,
                ConfigSource::File(default_path.to_string()),
            )),
            None => Ok((Self::home_defaults(), ConfigSource::BuiltinDefaults)),
        }
    }

    /// Default configuration for the home network deployment
    ///
    /// Suitable for testing and development. Other deployments should use
    /// a proper TOML configuration file.
    pub fn home_defaults() -> Self {
        Self {
            network: NetworkConfig {
                command_address: "192.168.178.40:5556".to_string(),
                frame_address: "192.168.178.40:6665".to_string(),
            },
            control: ControlConfig {
                base_speed: 30,
                poll_interval_ms: 20,
            },
            capture: CaptureConfig {
                output_dir: "captures".to_string(),
                debounce_ms: 200,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::home_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::home_defaults();
        assert_eq!(config.network.command_address, "192.168.178.40:5556");
        assert_eq!(config.network.frame_address, "192.168.178.40:6665");
        assert_eq!(config.control.base_speed, 30);
        assert_eq!(config.control.poll_interval_ms, 20);
        assert_eq!(config.capture.output_dir, "captures");
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::home_defaults();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        // Should contain all sections
        assert!(toml_string.contains("[network]"));
        assert!(toml_string.contains("[control]"));
        assert!(toml_string.contains("[capture]"));
        assert!(toml_string.contains("[logging]"));

        // Should contain key values
        assert!(toml_string.contains("base_speed = 30"));
        assert!(toml_string.contains("command_address = \"192.168.178.40:5556\""));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[network]
command_address = "10.0.0.7:5556"
frame_address = "10.0.0.7:6665"

[control]
base_speed = 40
poll_interval_ms = 10

[capture]
output_dir = "/tmp/dataset"
debounce_ms = 150

[logging]
level = "debug"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.network.command_address, "10.0.0.7:5556");
        assert_eq!(config.control.base_speed, 40);
        assert_eq!(config.capture.output_dir, "/tmp/dataset");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_resolve_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo.toml");
        assert!(AppConfig::resolve(missing.to_str(), "unused.toml").is_err());
    }

    #[test]
    fn test_resolve_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");
        let mut config = AppConfig::home_defaults();
        config.control.base_speed = 42;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let (loaded, source) = AppConfig::resolve(path.to_str(), "unused.toml").unwrap();
        assert_eq!(loaded.control.base_speed, 42);
        assert_eq!(source, ConfigSource::File(path.to_str().unwrap().to_string()));
    }

    #[test]
    fn test_resolve_missing_default_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("drishti-teleop.toml");
        let (config, source) = AppConfig::resolve(None, default_path.to_str().unwrap()).unwrap();
        assert_eq!(config.control.base_speed, 30);
        assert_eq!(source, ConfigSource::BuiltinDefaults);
    }

    #[test]
    fn test_resolve_prefers_existing_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("drishti-teleop.toml");
        let mut config = AppConfig::home_defaults();
        config.control.base_speed = 55;
        std::fs::write(&default_path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let (loaded, source) =
            AppConfig::resolve(None, default_path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.control.base_speed, 55);
        assert!(matches!(source, ConfigSource::File(_)));
    }
}
