//! Event type definitions for the location relay.
//!
//! Two event kinds flow out of the Zephr SDK: GNSS fixes and pose samples.
//! Both are immutable values created by the source on each SDK callback.
//! Events are cloneable and serializable for logging and replay.

use serde::{Deserialize, Serialize};

/// Availability of the GNSS fix source
///
/// Mirrors the tri-state availability reported by mobile location providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GnssStatus {
    /// Source is healthy and producing fixes
    Ok,
    /// Source is temporarily unable to produce fixes (e.g. signal loss)
    TemporarilyUnavailable,
    /// Source is out of service
    Unavailable,
}

impl std::fmt::Display for GnssStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "Ok"),
            Self::TemporarilyUnavailable => write!(f, "TemporarilyUnavailable"),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// A geodetic position in WGS-84 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above the ellipsoid in meters
    pub altitude: f64,
}

impl GeoPosition {
    /// Create a new position
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        debug_assert!(
            latitude.is_finite() && longitude.is_finite() && altitude.is_finite(),
            "GeoPosition components must be finite: lat={latitude}, lon={longitude}, alt={altitude}"
        );
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// A single GNSS update pushed by the SDK
///
/// The location is absent when the source cannot currently produce a fix;
/// the status says why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GnssEvent {
    /// Health of the fix source at the time of the update
    pub status: GnssStatus,
    /// The fix itself, if one was available
    pub location: Option<GeoPosition>,
}

impl GnssEvent {
    /// Create an event carrying a fix
    pub fn fix(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            status: GnssStatus::Ok,
            location: Some(GeoPosition::new(latitude, longitude, altitude)),
        }
    }

    /// Create an event reporting that no fix is available
    pub fn unavailable(status: GnssStatus) -> Self {
        Self {
            status,
            location: None,
        }
    }

    /// Whether this event carries a usable fix
    pub fn has_fix(&self) -> bool {
        self.location.is_some()
    }

    fn description(&self) -> String {
        match &self.location {
            Some(pos) => format!(
                "GNSS {}: lat {:.6} lon {:.6} alt {:.1}m",
                self.status, pos.latitude, pos.longitude, pos.altitude
            ),
            None => format!("GNSS {}: no fix", self.status),
        }
    }
}

/// A single orientation sample pushed by the SDK
///
/// Angles are in degrees. The timestamp is the SDK's monotonic sample time
/// in milliseconds; it is not comparable to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEvent {
    /// Rotation around the vertical axis in degrees
    pub yaw: f64,
    /// Rotation around the lateral axis in degrees
    pub pitch: f64,
    /// Rotation around the longitudinal axis in degrees
    pub roll: f64,
    /// SDK sample time in milliseconds
    pub timestamp_ms: u64,
}

impl PoseEvent {
    /// Create a new pose sample
    pub fn new(yaw: f64, pitch: f64, roll: f64, timestamp_ms: u64) -> Self {
        Self {
            yaw,
            pitch,
            roll,
            timestamp_ms,
        }
    }

    fn description(&self) -> String {
        format!(
            "Pose: yaw {:.1} pitch {:.1} roll {:.1} @ {}ms",
            self.yaw, self.pitch, self.roll, self.timestamp_ms
        )
    }
}

/// Root event enum covering everything the relay carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationEvent {
    /// A GNSS fix update
    Gnss(GnssEvent),
    /// An orientation sample
    Pose(PoseEvent),
}

impl LocationEvent {
    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            LocationEvent::Gnss(_) => EventKind::Gnss,
            LocationEvent::Pose(_) => EventKind::Pose,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            LocationEvent::Gnss(e) => e.description(),
            LocationEvent::Pose(e) => e.description(),
        }
    }
}

/// Event kind discriminant for filtering and per-kind plumbing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// GNSS fix updates
    Gnss,
    /// Orientation samples
    Pose,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Gnss => write!(f, "Gnss"),
            EventKind::Pose => write!(f, "Pose"),
        }
    }
}
