//! Tests for the location service: lifecycle idempotence, permission
//! gating, and event relay end to end.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zephrkit_core::{
    ConnectionState, GnssEvent, GnssStatus, LatestObserver, LocationEvent, PoseEvent, SourceError,
};
use zephrkit_sdk::{LocationListener, LocationSource, NoOpSource, PermissionSet};
use zephrkit_service::LocationService;

/// Shared handles into a `MockSource` after it has been boxed away
#[derive(Clone)]
struct MockHandles {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    listener: Arc<Mutex<Option<Arc<dyn LocationListener>>>>,
}

impl MockHandles {
    fn push_gnss(&self, event: GnssEvent) {
        let listener = self.listener.lock().unwrap();
        listener.as_ref().expect("source not started").on_gnss(event);
    }

    fn push_pose(&self, event: PoseEvent) {
        let listener = self.listener.lock().unwrap();
        listener.as_ref().expect("source not started").on_pose(event);
    }
}

/// Source that records lifecycle calls and captures the listener so tests
/// can drive callbacks by hand
struct MockSource {
    handles: MockHandles,
    running: bool,
}

impl MockSource {
    fn new() -> (Self, MockHandles) {
        let handles = MockHandles {
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
            listener: Arc::new(Mutex::new(None)),
        };
        (
            Self {
                handles: handles.clone(),
                running: false,
            },
            handles,
        )
    }
}

#[async_trait]
impl LocationSource for MockSource {
    async fn start(&mut self, listener: Arc<dyn LocationListener>) -> Result<(), SourceError> {
        self.handles.starts.fetch_add(1, Ordering::SeqCst);
        *self.handles.listener.lock().unwrap() = Some(listener);
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) {
        self.handles.stops.fetch_add(1, Ordering::SeqCst);
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));

    service.start().await.unwrap();
    service.start().await.unwrap();

    assert_eq!(handles.starts.load(Ordering::SeqCst), 1);
    assert_eq!(service.state(), ConnectionState::Running);
    assert!(service.status().started_at.is_some());
}

#[tokio::test]
async fn test_stop_when_stopped_is_noop() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));

    service.stop().await;
    assert_eq!(handles.stops.load(Ordering::SeqCst), 0);
    assert_eq!(service.state(), ConnectionState::Stopped);
}

#[tokio::test]
async fn test_stop_tears_down_once() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));

    service.start().await.unwrap();
    service.stop().await;
    service.stop().await;

    assert_eq!(handles.stops.load(Ordering::SeqCst), 1);
    assert_eq!(service.state(), ConnectionState::Stopped);
    assert!(service.status().started_at.is_none());
}

#[tokio::test]
async fn test_restart_after_stop() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));

    service.start().await.unwrap();
    service.stop().await;
    service.start().await.unwrap();

    assert_eq!(handles.starts.load(Ordering::SeqCst), 2);
    assert_eq!(service.state(), ConnectionState::Running);
}

#[tokio::test]
async fn test_permission_denied_leaves_stopped() {
    let source = NoOpSource::new(PermissionSet::empty());
    let service = LocationService::new(Box::new(source));

    let err = service.start().await.unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(service.state(), ConnectionState::Stopped);
}

#[tokio::test]
async fn test_events_are_relayed() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));

    service.start().await.unwrap();
    let mut events = service.subscribe_events();

    handles.push_gnss(GnssEvent::fix(52.52, 13.40, 34.0));
    handles.push_pose(PoseEvent::new(90.0, 1.0, -1.0, 100));

    // Both kinds arrive on the combined stream, in order
    match events.recv().await.unwrap() {
        LocationEvent::Gnss(fix) => assert_eq!(fix.location.unwrap().altitude, 34.0),
        other => panic!("expected GNSS event, got {:?}", other),
    }
    match events.recv().await.unwrap() {
        LocationEvent::Pose(pose) => assert_eq!(pose.timestamp_ms, 100),
        other => panic!("expected pose event, got {:?}", other),
    }

    // The per-kind buses hold the latest of each
    assert!(service.gnss().latest().unwrap().has_fix());
    assert_eq!(service.pose().latest().unwrap().yaw, 90.0);

    let status = service.status();
    assert_eq!(status.gnss_events, 1);
    assert_eq!(status.pose_events, 1);
}

#[tokio::test]
async fn test_late_observer_sees_replay() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));

    service.start().await.unwrap();
    handles.push_gnss(GnssEvent::fix(1.0, 2.0, 3.0));

    // Attaching after the fix still yields it
    let observer = LatestObserver::attach(service.gnss());
    assert_eq!(observer.latest().unwrap().location.unwrap().latitude, 1.0);

    // The service outlives the observer
    drop(observer);
    assert_eq!(service.status().gnss_subscribers, 0);
    assert_eq!(service.state(), ConnectionState::Running);
}

#[tokio::test]
async fn test_two_subscriber_replay_scenario() {
    let (source, handles) = MockSource::new();
    let service = LocationService::new(Box::new(source));
    service.start().await.unwrap();

    let bus = service.gnss();
    let seen1 = Arc::new(Mutex::new(Vec::new()));
    let sink1 = seen1.clone();
    let s1 = bus.subscribe(move |e: GnssEvent| sink1.lock().unwrap().push(e));

    handles.push_gnss(GnssEvent::fix(1.0, 2.0, 3.0));
    assert_eq!(seen1.lock().unwrap().len(), 1);

    let seen2 = Arc::new(Mutex::new(Vec::new()));
    let sink2 = seen2.clone();
    let _s2 = bus.subscribe(move |e: GnssEvent| sink2.lock().unwrap().push(e));
    assert_eq!(seen2.lock().unwrap().len(), 1);
    assert_eq!(seen2.lock().unwrap()[0].location.unwrap().latitude, 1.0);

    handles.push_gnss(GnssEvent::unavailable(GnssStatus::Unavailable));
    assert_eq!(seen1.lock().unwrap().len(), 2);
    assert_eq!(seen2.lock().unwrap().len(), 2);

    bus.unsubscribe(s1);
    handles.push_gnss(GnssEvent::fix(7.0, 8.0, 9.0));
    assert_eq!(seen1.lock().unwrap().len(), 2);
    assert_eq!(seen2.lock().unwrap().len(), 3);
}
