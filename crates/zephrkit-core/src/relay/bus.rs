//! Relay bus implementation.
//!
//! Provides the per-event-kind publish/subscribe bridge between the
//! background service and its observers, with replay of the most recent
//! event to late joiners.

use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Type alias for event handler functions
type EventHandler<E> = Arc<dyn Fn(E) + Send + Sync>;

/// Configuration for a relay bus
#[derive(Debug, Clone)]
pub struct RelayBusConfig {
    /// Channel capacity for the async broadcast mirror.
    pub channel_capacity: usize,
    /// Whether to replay the most recent event to new subscribers.
    pub replay_latest: bool,
}

impl Default for RelayBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            replay_latest: true,
        }
    }
}

/// Publish/subscribe bridge with replay-of-latest
///
/// One instance carries one event kind. Publishers emit events without
/// knowing the subscribers; subscribers register a synchronous handler and
/// receive every event published while they are registered, in publish
/// order. When replay is enabled, a new subscriber immediately receives the
/// most recently published event (if any) before any later one.
///
/// Handlers are called on the publishing thread and should return quickly.
/// A handler may call [`RelayBus::unsubscribe`] from inside a callback;
/// it must not call `subscribe`, `publish`, or `latest` re-entrantly.
pub struct RelayBus<E: Clone + Send + 'static> {
    /// Latest published event; doubles as the dispatch lock that serializes
    /// publish with subscribe so replay and live delivery never interleave.
    latest: Mutex<Option<E>>,
    /// Registered synchronous handlers, in registration order
    handlers: RwLock<Vec<(SubscriptionId, EventHandler<E>)>>,
    /// Broadcast channel sender for async receivers
    sender: broadcast::Sender<E>,
    /// Configuration
    config: RelayBusConfig,
}

impl<E: Clone + Send + 'static> RelayBus<E> {
    /// Create a new relay bus with default configuration
    pub fn new() -> Self {
        Self::with_config(RelayBusConfig::default())
    }

    /// Create a new relay bus with custom configuration
    pub fn with_config(config: RelayBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self {
            latest: Mutex::new(None),
            handlers: RwLock::new(Vec::new()),
            sender,
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Stores the event as the latest value (when replay is enabled),
    /// notifies every currently registered handler, and mirrors the event
    /// into the broadcast channel. Publishing with zero subscribers
    /// succeeds; only the single latest value is buffered.
    ///
    /// Returns the number of handlers that completed delivery. A panicking
    /// handler is caught and logged without affecting the others.
    pub fn publish(&self, event: E) -> usize {
        let mut latest = self.latest.lock();
        if self.config.replay_latest {
            *latest = Some(event.clone());
        }

        // Snapshot outside the read guard so a handler may unsubscribe
        // (itself or another) without deadlocking against dispatch.
        let snapshot: Vec<EventHandler<E>> = {
            let handlers = self.handlers.read();
            handlers.iter().map(|(_, h)| h.clone()).collect()
        };

        let mut delivered = 0;
        for handler in snapshot {
            if invoke_handler(&handler, event.clone()) {
                delivered += 1;
            }
        }

        // Async receivers; a send error just means none are listening.
        let _ = self.sender.send(event);

        delivered
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// When the bus holds a previously published event and replay is
    /// enabled, the handler receives that event before returning, and
    /// before any subsequently published event.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let handler: EventHandler<E> = Arc::new(handler);

        // Taking the dispatch lock first keeps registration and replay
        // atomic with respect to publish: the new handler either sees an
        // event via replay or via the in-flight dispatch, never both.
        let latest = self.latest.lock();
        self.handlers.write().push((id, handler.clone()));
        if let Some(event) = latest.as_ref() {
            invoke_handler(&handler, event.clone());
        }
        drop(latest);

        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Idempotent: returns true if the subscription was found and removed.
    /// Safe to call from within a handler callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(sid, _)| *sid != id);
        let removed = handlers.len() != before;
        drop(handlers);
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get a receiver for async event consumption
    ///
    /// Useful for tokio tasks that want to await events instead of
    /// registering a synchronous handler. The receiver observes events
    /// published after this call; it does not receive the replay.
    pub fn receiver(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    /// Get a clone of the most recently published event, if any
    pub fn latest(&self) -> Option<E> {
        self.latest.lock().clone()
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Get the current configuration
    pub fn config(&self) -> &RelayBusConfig {
        &self.config
    }
}

impl<E: Clone + Send + 'static> Default for RelayBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Send + 'static> std::fmt::Debug for RelayBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

/// Call a handler, isolating panics so one failing subscriber cannot
/// prevent delivery to the rest. Returns whether the handler completed.
fn invoke_handler<E>(handler: &EventHandler<E>, event: E) -> bool {
    match catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!("Relay handler panicked; continuing delivery");
            false
        }
    }
}
