//! # ZephrKit SDK Boundary
//!
//! The seam between ZephrKit and the proprietary location SDK. The SDK is
//! an opaque push source; this crate defines the listener and source traits
//! the rest of the stack programs against, the OS capability gate that must
//! pass before a session starts, and two SDK-free sources: a deterministic
//! simulator and a no-op placeholder.

pub mod permissions;
pub mod simulated;
pub mod source;

pub use permissions::{Capability, PermissionSet};
pub use simulated::{SimulatedSource, SimulationConfig};
pub use source::{LocationListener, LocationSource, NoOpSource};
