//! # ZephrKit Service
//!
//! The background holder of the location session. A [`LocationService`] is
//! created once at application scope, owns the only live connection to the
//! location source, and relays every event into per-kind replay buses that
//! observers attach to and detach from freely.

mod service;

pub use service::{LocationService, ServiceConfig, ServiceStatus};
