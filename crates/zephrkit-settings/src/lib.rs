//! # ZephrKit Settings
//!
//! Handles application configuration and TOML persistence in the platform
//! configuration directory.

pub mod config;
pub mod error;

pub use config::{Config, LoggingSettings, RelaySettings, SimulationSettings};
pub use error::{Result, SettingsError};
