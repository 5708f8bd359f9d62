//! Demo client: relays simulated location updates to the log.
//!
//! Wires the full stack the way a host application would: configuration,
//! a permission-gated source, the background service, latest-value
//! observers, and the combined event stream.

use std::time::Duration;
use tokio::sync::broadcast;
use zephrkit::{
    Config, LatestObserver, LocationEvent, LocationService, PermissionSet, RelayBusConfig,
    ServiceConfig, SimulatedSource, SimulationConfig, SimulationSettings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config first so the log level preference applies from the start
    let config = Config::load_or_default()?;
    zephrkit::init_logging(&config.logging.level)?;

    tracing::info!(
        "ZephrKit {} (built {})",
        zephrkit::VERSION,
        zephrkit::BUILD_DATE
    );

    // A real host would drive this from the OS permission flow; the demo
    // process grants everything up front.
    let permissions = PermissionSet::all_granted();
    let source = SimulatedSource::new(permissions, simulation_config(&config.simulation));
    let service = LocationService::with_config(Box::new(source), service_config(&config));

    let gnss_watch = LatestObserver::attach(service.gnss());
    let pose_watch = LatestObserver::attach(service.pose());

    service.start().await?;
    tracing::info!("Relaying location updates; press Ctrl-C to stop");

    let mut events = service.subscribe_events();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => tracing::info!("{}", event.description()),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Dropped {} events", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    service.stop().await;

    if let Some(fix) = gnss_watch.latest() {
        tracing::info!("Last {}", LocationEvent::Gnss(fix).description());
    }
    if let Some(pose) = pose_watch.latest() {
        tracing::info!("Last {}", LocationEvent::Pose(pose).description());
    }
    tracing::info!("Final status: {}", service.status());

    Ok(())
}

fn service_config(config: &Config) -> ServiceConfig {
    ServiceConfig {
        gnss_bus: RelayBusConfig {
            channel_capacity: config.relay.channel_capacity,
            replay_latest: true,
        },
        pose_bus: RelayBusConfig {
            channel_capacity: config.relay.channel_capacity,
            replay_latest: config.relay.replay_pose,
        },
        event_channel_capacity: config.relay.channel_capacity,
    }
}

fn simulation_config(settings: &SimulationSettings) -> SimulationConfig {
    SimulationConfig {
        update_interval: Duration::from_millis(settings.update_interval_ms),
        origin_latitude: settings.origin_latitude,
        origin_longitude: settings.origin_longitude,
        altitude_m: settings.altitude_m,
        walk_radius_m: settings.walk_radius_m,
        pose_every_n_fixes: settings.pose_every_n_fixes,
    }
}
