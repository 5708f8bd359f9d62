//! Connection state machine for the background service
//!
//! Tracks the lifecycle of the single SDK session. State is owned
//! exclusively by the service and changes only through explicit
//! `start`/`stop` calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the SDK session
///
/// The full lifecycle is `Stopped -> Starting -> Running -> Stopped`.
/// A failed start falls back from `Starting` to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    /// No session; safe to start
    #[default]
    Stopped,
    /// Session establishment in progress
    Starting,
    /// Session active, events flowing
    Running,
}

impl ConnectionState {
    /// Check if this state indicates a session is live or being established
    pub fn is_active(&self) -> bool {
        !matches!(self, ConnectionState::Stopped)
    }

    /// Check if a transition from this state to `target` is valid.
    ///
    /// Returns `true` for valid transitions:
    /// - Stopped → Starting
    /// - Starting → Running (success), Starting → Stopped (failure)
    /// - Running → Stopped
    pub fn can_transition_to(&self, target: ConnectionState) -> bool {
        use ConnectionState::*;
        if *self == target {
            return true;
        }
        matches!(
            (self, target),
            (Stopped, Starting) | (Starting, Running | Stopped) | (Running, Stopped)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Starting => write!(f, "Starting"),
            Self::Running => write!(f, "Running"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        use ConnectionState::*;
        assert!(Stopped.can_transition_to(Starting));
        assert!(Starting.can_transition_to(Running));
        assert!(Starting.can_transition_to(Stopped));
        assert!(Running.can_transition_to(Stopped));
    }

    #[test]
    fn test_invalid_transitions() {
        use ConnectionState::*;
        assert!(!Stopped.can_transition_to(Running));
        assert!(!Running.can_transition_to(Starting));
    }

    #[test]
    fn test_self_transition_allowed() {
        use ConnectionState::*;
        assert!(Stopped.can_transition_to(Stopped));
        assert!(Running.can_transition_to(Running));
    }

    #[test]
    fn test_is_active() {
        assert!(!ConnectionState::Stopped.is_active());
        assert!(ConnectionState::Starting.is_active());
        assert!(ConnectionState::Running.is_active());
    }
}
