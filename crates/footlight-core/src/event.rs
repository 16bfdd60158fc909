//! Event kinds triggers can react to
//!
//! A closed enumeration rather than opaque registered tokens: identity is
//! variant equality and no name collisions are possible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The class of occurrence a trigger listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Green flag pressed (global reset + start)
    GreenFlag,
    /// A key was pressed (option `key`)
    KeyPressed,
    /// A broadcast was received (option `name`)
    BroadcastReceived,
    /// The entity was clicked
    Clicked,
    /// The entity started life as a clone
    CloneStarted,
    /// Loudness crossed a threshold (edge-activated)
    LoudnessGreaterThan,
    /// Timer crossed a threshold (edge-activated)
    TimerGreaterThan,
    /// The stage backdrop changed (option `backdrop`)
    BackdropChanged,
}

impl EventKind {
    /// Edge-activated kinds fire on a threshold crossing observed by the
    /// host, not on continuous re-evaluation by the scheduler
    pub fn is_edge_activated(&self) -> bool {
        matches!(
            self,
            EventKind::TimerGreaterThan | EventKind::LoudnessGreaterThan
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::GreenFlag => "green_flag",
            EventKind::KeyPressed => "key_pressed",
            EventKind::BroadcastReceived => "broadcast_received",
            EventKind::Clicked => "clicked",
            EventKind::CloneStarted => "clone_started",
            EventKind::LoudnessGreaterThan => "loudness_greater_than",
            EventKind::TimerGreaterThan => "timer_greater_than",
            EventKind::BackdropChanged => "backdrop_changed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_activated() {
        assert!(EventKind::TimerGreaterThan.is_edge_activated());
        assert!(EventKind::LoudnessGreaterThan.is_edge_activated());
        assert!(!EventKind::GreenFlag.is_edge_activated());
        assert!(!EventKind::KeyPressed.is_edge_activated());
    }

    #[test]
    fn test_identity_is_variant_equality() {
        assert_eq!(EventKind::Clicked, EventKind::Clicked);
        assert_ne!(EventKind::Clicked, EventKind::CloneStarted);
    }
}
