//! Configuration for ZephrKit
//!
//! Provides configuration file handling with validation. TOML files stored
//! in the platform-specific configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Relay settings (bus capacity, replay policy)
//! - Simulation settings (update cadence, walk geometry)
//! - Logging preferences

use crate::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relay bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Capacity of the async broadcast mirror on each bus
    pub channel_capacity: usize,
    /// Whether pose samples are replayed to late subscribers
    ///
    /// GNSS fixes are always replayed; this records the policy choice for
    /// the pose channel.
    pub replay_pose: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            replay_pose: true,
        }
    }
}

/// Simulated source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Milliseconds between GNSS fixes
    pub update_interval_ms: u64,
    /// Latitude of the simulated walk's center in decimal degrees
    pub origin_latitude: f64,
    /// Longitude of the simulated walk's center in decimal degrees
    pub origin_longitude: f64,
    /// Reported altitude in meters
    pub altitude_m: f64,
    /// Radius of the simulated walk in meters
    pub walk_radius_m: f64,
    /// Emit one pose sample every this many fixes; 0 disables poses
    pub pose_every_n_fixes: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
            origin_latitude: 52.520008,
            origin_longitude: 13.404954,
            altitude_m: 34.0,
            walk_radius_m: 25.0,
            pose_every_n_fixes: 1,
        }
    }
}

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default log level directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relay bus settings
    pub relay: RelaySettings,
    /// Simulated source settings
    pub simulation: SimulationSettings,
    /// Logging preferences
    pub logging: LoggingSettings,
}

impl Config {
    /// The default configuration file location
    ///
    /// `<platform config dir>/zephrkit/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))?;
        Ok(base.join("zephrkit").join("config.toml"))
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist
    ///
    /// A present-but-malformed file is an error, not a silent fallback.
    pub fn load_or_default() -> Result<Self> {
        let path = Config::default_path()?;
        if path.exists() {
            Config::load_from_file(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.relay.channel_capacity == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "relay.channel_capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.simulation.update_interval_ms == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "simulation.update_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&self.simulation.origin_latitude) {
            return Err(SettingsError::InvalidSetting {
                key: "simulation.origin_latitude".to_string(),
                reason: "must be between -90 and 90".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&self.simulation.origin_longitude) {
            return Err(SettingsError::InvalidSetting {
                key: "simulation.origin_longitude".to_string(),
                reason: "must be between -180 and 180".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.simulation.update_interval_ms = 250;
        config.relay.replay_pose = false;

        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulation]\nupdate_interval_ms = 50\n").unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.simulation.update_interval_ms, 50);
        assert_eq!(loaded.relay, RelaySettings::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        config.relay.channel_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));

        let mut config = Config::default();
        config.simulation.origin_latitude = 123.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "relay = \"not a table\"").unwrap();

        assert!(matches!(
            Config::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
