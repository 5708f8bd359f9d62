//! # ZephrKit
//!
//! A Rust client toolkit for the Zephr realtime GNSS/pose location SDK.
//! The SDK itself is an opaque push source of position fixes and
//! orientation samples; ZephrKit supplies everything a well-behaved client
//! needs around it: a permission-gated source boundary, a background
//! service that owns the single live session, and a replay bus that fans
//! events out to transient observers.
//!
//! ## Architecture
//!
//! ZephrKit is organized as a workspace with multiple crates:
//!
//! 1. **zephrkit-core** - Event model, relay bus, observer binding, errors
//! 2. **zephrkit-sdk** - Source/listener traits, permission gate, simulated source
//! 3. **zephrkit-service** - Background holder of the SDK session
//! 4. **zephrkit-settings** - Configuration and TOML persistence
//! 5. **zephrkit** - Demo binary that wires the stack together
//!
//! ## Features
//!
//! - **Single-session guarantee**: one live SDK connection process-wide,
//!   held by the service independent of observer lifetimes
//! - **Replay-of-latest**: late-joining observers immediately see the most
//!   recent fix and pose
//! - **Permission gating**: sources refuse to start without the required OS
//!   capabilities and name the missing one
//! - **SDK-free operation**: a deterministic simulated source for demos and
//!   tests

pub use zephrkit_core::{
    ConnectionState, Error, EventKind, GeoPosition, GnssEvent, GnssStatus, LatestObserver,
    LocationEvent, PoseEvent, RelayBus, RelayBusConfig, Result, SourceError, SubscriptionId,
};

pub use zephrkit_sdk::{
    Capability, LocationListener, LocationSource, NoOpSource, PermissionSet, SimulatedSource,
    SimulationConfig,
};

pub use zephrkit_service::{LocationService, ServiceConfig, ServiceStatus};

pub use zephrkit_settings::{
    Config, LoggingSettings, RelaySettings, SettingsError, SimulationSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - A fallback level directive used when RUST_LOG is unset
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level: tracing::Level = default_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
