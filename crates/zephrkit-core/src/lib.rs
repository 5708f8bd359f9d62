//! # ZephrKit Core
//!
//! Core types for ZephrKit: the event model, the relay bus with
//! replay-of-latest, the observer binding, error types, and the connection
//! state machine for the background service.

pub mod error;
pub mod events;
pub mod relay;
pub mod state;

pub use error::{Error, Result, SourceError};

pub use events::{EventKind, GeoPosition, GnssEvent, GnssStatus, LocationEvent, PoseEvent};

// Re-export the relay primitives for convenience
pub use relay::{LatestObserver, RelayBus, RelayBusConfig, SubscriptionId};

pub use state::ConnectionState;
