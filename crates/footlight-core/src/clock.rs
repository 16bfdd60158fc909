//! Tick-based scheduler clock
//!
//! One tick per rendering frame. The timer used by elapsed-time triggers is
//! an epoch within the same tick stream, restarted on green flag or on
//! script request.

use serde::{Deserialize, Serialize};

/// A discrete tick identifier (logical time unit)
pub type Tick = u64;

/// Scheduler clock state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    /// Current tick number
    tick: Tick,
    /// Tick at which the timer was last restarted
    timer_epoch: Tick,
}

impl Clock {
    /// Create a new clock at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next tick
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Get the current tick
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Restart the timer epoch
    pub fn restart_timer(&mut self) {
        self.timer_epoch = self.tick;
    }

    /// Ticks elapsed since the last timer restart
    pub fn timer_ticks(&self) -> Tick {
        self.tick - self.timer_epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.timer_ticks(), 2);
    }

    #[test]
    fn test_timer_restart() {
        let mut clock = Clock::new();
        clock.advance();
        clock.advance();
        clock.restart_timer();
        assert_eq!(clock.timer_ticks(), 0);

        clock.advance();
        assert_eq!(clock.timer_ticks(), 1);
        assert_eq!(clock.tick(), 3);
    }
}
