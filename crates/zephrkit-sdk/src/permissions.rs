//! OS capability gate for location sources.
//!
//! A source session may only be established while the required capabilities
//! are granted. Requesting capabilities from the user is the host
//! application's job; this module only models what has been granted so a
//! source can refuse to start without it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use zephrkit_core::SourceError;

/// An OS capability a location source may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Precise (GNSS-grade) location access
    FineLocation,
    /// Coarse (network-grade) location access
    CoarseLocation,
    /// Posting persistent notifications for the background session
    Notifications,
}

impl Capability {
    /// The capabilities a source session requires
    pub fn required() -> &'static [Capability] {
        &[
            Capability::FineLocation,
            Capability::CoarseLocation,
            Capability::Notifications,
        ]
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FineLocation => write!(f, "FineLocation"),
            Self::CoarseLocation => write!(f, "CoarseLocation"),
            Self::Notifications => write!(f, "Notifications"),
        }
    }
}

/// The set of capabilities currently granted to the process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    granted: HashSet<Capability>,
}

impl PermissionSet {
    /// Create a set with nothing granted
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a set with every required capability granted
    pub fn all_granted() -> Self {
        Self {
            granted: Capability::required().iter().copied().collect(),
        }
    }

    /// Grant a capability
    pub fn grant(&mut self, capability: Capability) -> &mut Self {
        self.granted.insert(capability);
        self
    }

    /// Revoke a capability
    pub fn revoke(&mut self, capability: Capability) -> &mut Self {
        self.granted.remove(&capability);
        self
    }

    /// Check whether a capability is granted
    pub fn is_granted(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    /// The required capabilities that are not granted
    pub fn missing_required(&self) -> Vec<Capability> {
        Capability::required()
            .iter()
            .copied()
            .filter(|c| !self.is_granted(*c))
            .collect()
    }

    /// Verify every required capability is granted
    ///
    /// Fails with [`SourceError::PermissionDenied`] naming the first missing
    /// capability. Sources call this at session establishment.
    pub fn check_required(&self) -> Result<(), SourceError> {
        match self.missing_required().first() {
            None => Ok(()),
            Some(missing) => Err(SourceError::PermissionDenied {
                capability: missing.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_granted_passes_check() {
        assert!(PermissionSet::all_granted().check_required().is_ok());
    }

    #[test]
    fn test_empty_set_fails_check() {
        let err = PermissionSet::empty().check_required().unwrap_err();
        assert!(matches!(err, SourceError::PermissionDenied { .. }));
    }

    #[test]
    fn test_missing_capability_is_named() {
        let mut set = PermissionSet::all_granted();
        set.revoke(Capability::Notifications);
        let err = set.check_required().unwrap_err();
        assert_eq!(err.to_string(), "Required permission not granted: Notifications");
    }

    #[test]
    fn test_grant_and_revoke() {
        let mut set = PermissionSet::empty();
        set.grant(Capability::FineLocation);
        assert!(set.is_granted(Capability::FineLocation));
        assert!(!set.is_granted(Capability::CoarseLocation));

        set.revoke(Capability::FineLocation);
        assert!(!set.is_granted(Capability::FineLocation));
        assert_eq!(set.missing_required().len(), 3);
    }
}
