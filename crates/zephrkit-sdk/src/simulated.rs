//! Simulated location source
//!
//! A deterministic stand-in for the proprietary SDK: walks a circle around
//! a configured origin, emitting one GNSS fix per interval and a pose
//! sample every N fixes. Lets the rest of the stack run (and be demoed)
//! without the real SDK or any hardware.

use crate::permissions::PermissionSet;
use crate::source::{LocationListener, LocationSource};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use zephrkit_core::{GnssEvent, PoseEvent, SourceError};

/// Meters per degree of latitude, good enough for a demo walk
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Degrees of arc the walk advances per fix
const DEGREES_PER_TICK: f64 = 3.0;

/// Configuration for the simulated source
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Time between GNSS fixes. Must be non-zero.
    pub update_interval: Duration,
    /// Latitude of the walk's center in decimal degrees
    pub origin_latitude: f64,
    /// Longitude of the walk's center in decimal degrees
    pub origin_longitude: f64,
    /// Reported altitude in meters
    pub altitude_m: f64,
    /// Radius of the circular walk in meters
    pub walk_radius_m: f64,
    /// Emit one pose sample every this many fixes; 0 disables poses
    pub pose_every_n_fixes: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(1),
            origin_latitude: 52.520008,
            origin_longitude: 13.404954,
            altitude_m: 34.0,
            walk_radius_m: 25.0,
            pose_every_n_fixes: 1,
        }
    }
}

impl SimulationConfig {
    /// Heading along the walk at a given tick, in degrees
    fn heading_at(&self, tick: u64) -> f64 {
        (tick as f64 * DEGREES_PER_TICK) % 360.0
    }

    /// The fix emitted at a given tick
    fn fix_at(&self, tick: u64) -> GnssEvent {
        let angle = self.heading_at(tick).to_radians();
        let dlat = self.walk_radius_m * angle.sin() / METERS_PER_DEGREE;
        let dlon = self.walk_radius_m * angle.cos()
            / (METERS_PER_DEGREE * self.origin_latitude.to_radians().cos());
        GnssEvent::fix(
            self.origin_latitude + dlat,
            self.origin_longitude + dlon,
            self.altitude_m,
        )
    }

    /// The pose sample emitted at a given tick
    fn pose_at(&self, tick: u64) -> PoseEvent {
        let angle = self.heading_at(tick);
        PoseEvent::new(
            // Tangent to the walk: heading plus a quarter turn
            (angle + 90.0) % 360.0,
            2.0 * angle.to_radians().sin(),
            2.0 * angle.to_radians().cos(),
            tick * self.update_interval.as_millis() as u64,
        )
    }
}

/// Deterministic location source for demos and tests
pub struct SimulatedSource {
    permissions: PermissionSet,
    config: SimulationConfig,
    worker: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
}

impl SimulatedSource {
    /// Create a simulated source gated by the given permission set
    pub fn new(permissions: PermissionSet, config: SimulationConfig) -> Self {
        debug_assert!(
            !config.update_interval.is_zero(),
            "update_interval must be non-zero"
        );
        Self {
            permissions,
            config,
            worker: None,
            shutdown: None,
        }
    }
}

#[async_trait]
impl LocationSource for SimulatedSource {
    async fn start(&mut self, listener: Arc<dyn LocationListener>) -> Result<(), SourceError> {
        self.permissions.check_required()?;
        if self.worker.is_some() {
            return Err(SourceError::AlreadyStarted);
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let config = self.config.clone();
        let worker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.update_interval);
            let mut tick: u64 = 0;
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = interval.tick() => {
                        listener.on_gnss(config.fix_at(tick));
                        if config.pose_every_n_fixes > 0
                            && tick % config.pose_every_n_fixes as u64 == 0
                        {
                            listener.on_pose(config.pose_at(tick));
                        }
                        tick += 1;
                    }
                }
            }
            tracing::debug!("Simulated source worker exited after {} fixes", tick);
        });

        self.worker = Some(worker);
        self.shutdown = Some(shutdown_tx);
        tracing::info!(
            "Simulated source started (interval {:?})",
            self.config.update_interval
        );
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
            tracing::info!("Simulated source stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}
