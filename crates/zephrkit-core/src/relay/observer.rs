//! Latest-value observer binding.
//!
//! Bridges the push-based relay bus to polling-style consumers: a UI layer
//! attaches an observer for its visible lifetime and reads the latest event
//! whenever it redraws.

use super::bus::{RelayBus, SubscriptionId};
use parking_lot::RwLock;
use std::sync::Arc;

/// Readable cell holding the most recent event from a relay bus
///
/// Attaches to the bus on construction, so when the bus already holds an
/// event the cell is populated immediately via replay. Detaches explicitly
/// via [`LatestObserver::detach`] or when dropped. The cell is empty until
/// the first event arrives.
///
/// Reconnection is not this type's concern: delivery is push-based and the
/// background service owns the SDK session lifecycle.
pub struct LatestObserver<E: Clone + Send + Sync + 'static> {
    bus: Arc<RelayBus<E>>,
    cell: Arc<RwLock<Option<E>>>,
    subscription: Option<SubscriptionId>,
}

impl<E: Clone + Send + Sync + 'static> LatestObserver<E> {
    /// Attach a new observer to the bus
    pub fn attach(bus: Arc<RelayBus<E>>) -> Self {
        let cell = Arc::new(RwLock::new(None));
        let sink = cell.clone();
        let subscription = bus.subscribe(move |event| {
            *sink.write() = Some(event);
        });
        Self {
            bus,
            cell,
            subscription: Some(subscription),
        }
    }

    /// Get a clone of the latest observed event, if any has arrived
    pub fn latest(&self) -> Option<E> {
        self.cell.read().clone()
    }

    /// Whether this observer is still registered with the bus
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Detach from the bus
    ///
    /// Idempotent. The cell keeps its last value but stops updating.
    pub fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
    }
}

impl<E: Clone + Send + Sync + 'static> Drop for LatestObserver<E> {
    fn drop(&mut self) {
        self.detach();
    }
}
