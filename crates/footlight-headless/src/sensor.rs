//! Loudness sensors with scripted levels

use footlight_core::LoudnessSensor;
use std::cell::Cell;
use std::rc::Rc;

/// Sensor that always reports the same level
///
/// `FixedLoudness(-1.0)` models a microphone the host could not open.
#[derive(Debug, Clone, Copy)]
pub struct FixedLoudness(pub f64);

impl LoudnessSensor for FixedLoudness {
    fn current_level(&self) -> f64 {
        self.0
    }
}

/// Sensor whose level the test driver adjusts between frames
///
/// Clones share the level cell, so the handle kept by the test and the
/// one captured by a trigger option observe the same value.
#[derive(Debug, Clone)]
pub struct SharedLoudness {
    level: Rc<Cell<f64>>,
}

impl SharedLoudness {
    /// Start at a level, usually 0.0 or -1.0 for "not yet available"
    pub fn new(level: f64) -> Self {
        Self {
            level: Rc::new(Cell::new(level)),
        }
    }

    /// Set the level reported from now on
    pub fn set_level(&self, level: f64) {
        self.level.set(level);
    }
}

impl LoudnessSensor for SharedLoudness {
    fn current_level(&self) -> f64 {
        self.level.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footlight_core::{loudness_over, Cast, Value};

    #[test]
    fn test_shared_level_visible_through_option() {
        let mut cast = Cast::new();
        cast.add_sprite("Mic").unwrap();
        let entity = cast.sprite("Mic").unwrap();

        let sensor = SharedLoudness::new(-1.0);
        let option = loudness_over(Rc::new(sensor.clone()), 30.0);

        assert_eq!(option.resolve(entity), Value::Bool(false));
        sensor.set_level(80.0);
        assert_eq!(option.resolve(entity), Value::Bool(true));
    }
}
