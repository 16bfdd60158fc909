//! Input state exposed to scripts
//!
//! The input collaborator translates raw occurrences into `fire_event`
//! calls; this struct only tracks what scripts may poll between events:
//! currently-held keys and the last pointer position.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A point in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Currently-held keys and pointer position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyState {
    held: IndexSet<String>,
    pointer: Point,
}

impl KeyState {
    /// Create empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down
    pub fn press(&mut self, key: impl Into<String>) {
        self.held.insert(key.into());
    }

    /// Record a key going up
    pub fn release(&mut self, key: &str) {
        self.held.shift_remove(key);
    }

    /// Whether a key is currently held
    pub fn is_down(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Whether any key is currently held
    pub fn any_down(&self) -> bool {
        !self.held.is_empty()
    }

    /// Record the pointer position
    pub fn set_pointer(&mut self, point: Point) {
        self.pointer = point;
    }

    /// Last recorded pointer position
    pub fn pointer(&self) -> Point {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut keys = KeyState::new();
        keys.press("space");
        assert!(keys.is_down("space"));
        assert!(keys.any_down());

        keys.release("space");
        assert!(!keys.is_down("space"));
        assert!(!keys.any_down());
    }

    #[test]
    fn test_pointer() {
        let mut keys = KeyState::new();
        keys.set_pointer(Point::new(10.0, -4.0));
        assert_eq!(keys.pointer(), Point::new(10.0, -4.0));
    }
}
