//! Location source interface
//!
//! Defines the boundary to the proprietary location SDK: a push-based
//! source that, once started, delivers GNSS and pose events to a listener
//! until stopped. All positioning happens inside the SDK; implementations
//! here only manage the session and forward callbacks.

use crate::permissions::PermissionSet;
use async_trait::async_trait;
use std::sync::Arc;
use zephrkit_core::{GnssEvent, PoseEvent, SourceError};

/// Listener for source events
///
/// Implement this trait to receive the SDK's push callbacks. Both methods
/// default to no-ops so implementors override only the kinds they consume.
/// Callbacks may fire on any thread; implementations must return quickly.
pub trait LocationListener: Send + Sync {
    /// Called on each GNSS update
    fn on_gnss(&self, _event: GnssEvent) {}

    /// Called on each pose sample
    fn on_pose(&self, _event: PoseEvent) {}
}

/// A push-based source of location events
///
/// At most one session may be live per source. Callers are expected to
/// serialize `start`/`stop`; a second `start` without an intervening `stop`
/// is an error.
#[async_trait]
pub trait LocationSource: Send {
    /// Establish the session and begin pushing events to the listener
    ///
    /// Fails with [`SourceError::PermissionDenied`] when a required OS
    /// capability is missing at call time; the source cannot request
    /// capabilities itself.
    async fn start(&mut self, listener: Arc<dyn LocationListener>) -> Result<(), SourceError>;

    /// Tear the session down
    ///
    /// Infallible and idempotent: stopping a stopped source is a no-op.
    async fn stop(&mut self);

    /// Whether a session is currently live
    fn is_running(&self) -> bool;
}

/// A source that establishes a session but never emits
///
/// Placeholder wiring for hosts that want the full lifecycle (including the
/// permission gate) without a real SDK attached.
pub struct NoOpSource {
    permissions: PermissionSet,
    running: bool,
}

impl NoOpSource {
    /// Create a no-op source gated by the given permission set
    pub fn new(permissions: PermissionSet) -> Self {
        Self {
            permissions,
            running: false,
        }
    }
}

#[async_trait]
impl LocationSource for NoOpSource {
    async fn start(&mut self, _listener: Arc<dyn LocationListener>) -> Result<(), SourceError> {
        self.permissions.check_required()?;
        if self.running {
            return Err(SourceError::AlreadyStarted);
        }
        self.running = true;
        tracing::debug!("No-op source started");
        Ok(())
    }

    async fn stop(&mut self) {
        self.running = false;
        tracing::debug!("No-op source stopped");
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
