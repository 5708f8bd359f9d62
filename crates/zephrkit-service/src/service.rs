//! Background location service
//!
//! Owns the single live session to a location source, independent of any
//! observer's lifetime. Start/stop transitions are serialized; every source
//! callback is forwarded into the per-kind relay buses and mirrored into a
//! combined broadcast stream.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use zephrkit_core::{
    ConnectionState, GnssEvent, LocationEvent, PoseEvent, RelayBus, RelayBusConfig, Result,
};
use zephrkit_sdk::{LocationListener, LocationSource};

/// Configuration for the location service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Relay bus configuration for GNSS fixes
    pub gnss_bus: RelayBusConfig,
    /// Relay bus configuration for pose samples
    pub pose_bus: RelayBusConfig,
    /// Capacity of the combined async event channel
    pub event_channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gnss_bus: RelayBusConfig::default(),
            pose_bus: RelayBusConfig::default(),
            event_channel_capacity: 1024,
        }
    }
}

/// Snapshot of the service's current state and counters
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Current session lifecycle state
    pub state: ConnectionState,
    /// When the current session started, if one is running
    pub started_at: Option<DateTime<Utc>>,
    /// GNSS fixes relayed since creation
    pub gnss_events: u64,
    /// Pose samples relayed since creation
    pub pose_events: u64,
    /// Subscribers currently attached to the GNSS bus
    pub gnss_subscribers: usize,
    /// Subscribers currently attached to the pose bus
    pub pose_subscribers: usize,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} fixes, {} poses, {}+{} subscribers)",
            self.state,
            self.gnss_events,
            self.pose_events,
            self.gnss_subscribers,
            self.pose_subscribers
        )
    }
}

/// State shared between the service and its forwarding listener
struct SharedState {
    state: RwLock<ConnectionState>,
    started_at: RwLock<Option<DateTime<Utc>>>,
    gnss_events: AtomicU64,
    pose_events: AtomicU64,
}

/// The background holder of the location session
///
/// Created once at application scope and shared (via `Arc`) with whoever
/// needs the buses; persists across observer attach/detach cycles.
/// `start`/`stop` may be called from any task; transitions are serialized
/// internally, and repeating a call in the current state is a no-op.
pub struct LocationService {
    /// The source, behind an async mutex so transitions are serialized
    source: Mutex<Box<dyn LocationSource>>,
    shared: Arc<SharedState>,
    gnss: Arc<RelayBus<GnssEvent>>,
    pose: Arc<RelayBus<PoseEvent>>,
    events: broadcast::Sender<LocationEvent>,
}

/// Listener handed to the source on start; fans callbacks into the buses
struct BusForwarder {
    shared: Arc<SharedState>,
    gnss: Arc<RelayBus<GnssEvent>>,
    pose: Arc<RelayBus<PoseEvent>>,
    events: broadcast::Sender<LocationEvent>,
}

impl LocationListener for BusForwarder {
    fn on_gnss(&self, event: GnssEvent) {
        self.shared.gnss_events.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Relaying {}", LocationEvent::Gnss(event).description());
        self.gnss.publish(event);
        let _ = self.events.send(LocationEvent::Gnss(event));
    }

    fn on_pose(&self, event: PoseEvent) {
        self.shared.pose_events.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Relaying {}", LocationEvent::Pose(event).description());
        self.pose.publish(event);
        let _ = self.events.send(LocationEvent::Pose(event));
    }
}

impl LocationService {
    /// Create a service owning the given source, with default configuration
    pub fn new(source: Box<dyn LocationSource>) -> Self {
        Self::with_config(source, ServiceConfig::default())
    }

    /// Create a service owning the given source
    pub fn with_config(source: Box<dyn LocationSource>, config: ServiceConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        Self {
            source: Mutex::new(source),
            shared: Arc::new(SharedState {
                state: RwLock::new(ConnectionState::Stopped),
                started_at: RwLock::new(None),
                gnss_events: AtomicU64::new(0),
                pose_events: AtomicU64::new(0),
            }),
            gnss: Arc::new(RelayBus::with_config(config.gnss_bus)),
            pose: Arc::new(RelayBus::with_config(config.pose_bus)),
            events,
        }
    }

    /// Start the session
    ///
    /// No-op when already `Starting` or `Running` (the source is started at
    /// most once per session). On failure — including a missing OS
    /// capability — the state reverts to `Stopped` and the error is
    /// surfaced; nothing is retried internally.
    pub async fn start(&self) -> Result<()> {
        let mut source = self.source.lock().await;
        if self.state().is_active() {
            tracing::debug!("Location service already {}", self.state());
            return Ok(());
        }

        self.set_state(ConnectionState::Starting);
        let listener = Arc::new(BusForwarder {
            shared: self.shared.clone(),
            gnss: self.gnss.clone(),
            pose: self.pose.clone(),
            events: self.events.clone(),
        });

        match source.start(listener).await {
            Ok(()) => {
                self.set_state(ConnectionState::Running);
                *self.shared.started_at.write() = Some(Utc::now());
                tracing::info!("Location service running");
                Ok(())
            }
            Err(e) => {
                self.set_state(ConnectionState::Stopped);
                tracing::warn!("Location service failed to start: {}", e);
                Err(e.into())
            }
        }
    }

    /// Stop the session
    ///
    /// No-op when already `Stopped`; otherwise the source is torn down and
    /// the state becomes `Stopped` unconditionally. Never fails.
    pub async fn stop(&self) {
        let mut source = self.source.lock().await;
        if !self.state().is_active() {
            return;
        }

        source.stop().await;
        self.set_state(ConnectionState::Stopped);
        *self.shared.started_at.write() = None;
        tracing::info!("Location service stopped");
    }

    /// Current session lifecycle state
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.read()
    }

    /// The relay bus carrying GNSS fixes
    pub fn gnss(&self) -> Arc<RelayBus<GnssEvent>> {
        self.gnss.clone()
    }

    /// The relay bus carrying pose samples
    pub fn pose(&self) -> Arc<RelayBus<PoseEvent>> {
        self.pose.clone()
    }

    /// Subscribe to the combined async event stream
    ///
    /// The receiver observes events from the subscription point onward;
    /// replay applies only to the per-kind buses.
    pub fn subscribe_events(&self) -> broadcast::Receiver<LocationEvent> {
        self.events.subscribe()
    }

    /// Snapshot the service's state and counters
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            state: self.state(),
            started_at: *self.shared.started_at.read(),
            gnss_events: self.shared.gnss_events.load(Ordering::Relaxed),
            pose_events: self.shared.pose_events.load(Ordering::Relaxed),
            gnss_subscribers: self.gnss.subscriber_count(),
            pose_subscribers: self.pose.subscriber_count(),
        }
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.shared.state.write();
        debug_assert!(
            state.can_transition_to(next),
            "invalid transition {} -> {}",
            *state,
            next
        );
        tracing::debug!("Location service {} -> {}", *state, next);
        *state = next;
    }
}

impl fmt::Debug for LocationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService")
            .field("state", &self.state())
            .finish()
    }
}
