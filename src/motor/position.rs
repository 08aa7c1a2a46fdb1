//! Position tracking for the actuator.
//!
//! Keeps the absolute step count plus the fractional step not yet emitted, so
//! velocity integration at millisecond granularity does not drift.

use crate::config::units::Steps;

/// Actuator position tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    /// Current position in whole steps (from origin)
    steps: Steps,
    /// Sub-step remainder carried between integrations, always in (-1, 1)
    remainder: f32,
}

impl Position {
    /// Create a position tracker at the origin.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Set position in steps, discarding any fractional carry.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
        self.remainder = 0.0;
    }

    /// Move by a whole number of steps.
    #[inline]
    pub fn move_steps(&mut self, delta: i64) {
        self.steps = Steps(self.steps.0 + delta);
    }

    /// Integrate a signed step rate over `dt_ms`.
    ///
    /// Returns the number of whole steps emitted.
    pub fn integrate(&mut self, steps_per_sec: f32, dt_ms: u32) -> i64 {
        self.remainder += steps_per_sec * dt_ms as f32 / 1000.0;
        let whole = self.remainder as i64;
        self.remainder -= whole as f32;
        self.move_steps(whole);
        whole
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_carries_fractions() {
        let mut pos = Position::new();

        // 250 steps/s for 1 ms is a quarter step; eight calls emit two whole steps
        let emitted: i64 = (0..8).map(|_| pos.integrate(250.0, 1)).sum();
        assert_eq!(emitted, 2);
        assert_eq!(pos.steps().value(), 2);

        for _ in 0..992 {
            pos.integrate(250.0, 1);
        }
        assert_eq!(pos.steps().value(), 250);
    }

    #[test]
    fn test_set_steps_clears_remainder() {
        let mut pos = Position::new();
        pos.integrate(500.0, 1);
        pos.set_steps(Steps(0));
        pos.integrate(500.0, 1);
        assert_eq!(pos.steps().value(), 0);
    }

    #[test]
    fn test_integrate_backwards() {
        let mut pos = Position::new();
        pos.set_steps(Steps(100));
        assert_eq!(pos.integrate(-3200.0, 250), -800);
        assert_eq!(pos.steps().value(), -700);
    }
}
