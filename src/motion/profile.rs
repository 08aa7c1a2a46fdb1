//! Trapezoidal step profile.
//!
//! Used by positioning moves (the homing back-off). Jogging uses the S-curve
//! ramps in [`scurve`](super::scurve) instead.

use libm::sqrtf;

/// Direction of plunger travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count (away from the limit switch).
    Forward,
    /// Negative step count (toward the limit switch).
    Backward,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// Apply this direction to an unsigned speed.
    #[inline]
    pub fn apply(self, speed: f32) -> f32 {
        match self {
            Direction::Forward => speed,
            Direction::Backward => -speed,
        }
    }
}

/// Current phase of a positioning move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise velocity.
    Accelerating,
    /// Moving at constant cruise velocity.
    Cruising,
    /// Decelerating from cruise velocity to rest.
    Decelerating,
    /// Motion complete.
    Complete,
}

/// Computed trapezoidal profile for a positioning move.
#[derive(Debug, Clone)]
pub struct TrapezoidalProfile {
    /// Total steps to move (absolute value).
    pub total_steps: u32,

    /// Direction of motion.
    pub direction: Direction,

    /// Steps in acceleration phase.
    pub accel_steps: u32,

    /// Steps in cruise phase (constant velocity).
    pub cruise_steps: u32,

    /// Steps in deceleration phase.
    pub decel_steps: u32,

    /// Cruise velocity in steps/sec.
    pub cruise_velocity: f32,

    /// Acceleration rate in steps/sec².
    pub accel_rate: f32,
}

impl TrapezoidalProfile {
    /// Create a symmetric trapezoidal profile.
    ///
    /// # Arguments
    ///
    /// * `total_steps` - Signed step count (positive = forward)
    /// * `max_velocity` - Maximum velocity in steps/sec
    /// * `acceleration` - Acceleration and deceleration rate in steps/sec²
    pub fn new(total_steps: i64, max_velocity: f32, acceleration: f32) -> Self {
        let direction = Direction::from_steps(total_steps);
        let steps = total_steps.unsigned_abs().min(u32::MAX as u64) as u32;

        if steps == 0 || !(max_velocity > 0.0) || !(acceleration > 0.0) {
            return Self::zero();
        }

        // Distance to reach max velocity: d = v² / 2a
        let ramp_distance = max_velocity * max_velocity / (2.0 * acceleration);

        let (accel_steps, cruise_steps, decel_steps, cruise_velocity) =
            if 2.0 * ramp_distance >= steps as f32 {
                // Triangle profile: peak where the two ramps meet
                let accel_steps = steps / 2;
                let decel_steps = steps - accel_steps;
                let peak = sqrtf(2.0 * acceleration * accel_steps.max(1) as f32);
                (accel_steps, 0u32, decel_steps, peak)
            } else {
                let ramp_steps = ramp_distance as u32;
                let cruise_steps = steps.saturating_sub(2 * ramp_steps);
                (ramp_steps, cruise_steps, ramp_steps, max_velocity)
            };

        Self {
            total_steps: steps,
            direction,
            accel_steps,
            cruise_steps,
            decel_steps,
            cruise_velocity,
            accel_rate: acceleration,
        }
    }

    /// Create a zero-length profile (no motion).
    pub fn zero() -> Self {
        Self {
            total_steps: 0,
            direction: Direction::Forward,
            accel_steps: 0,
            cruise_steps: 0,
            decel_steps: 0,
            cruise_velocity: 0.0,
            accel_rate: 0.0,
        }
    }

    /// Check if this is a zero-length profile.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.total_steps == 0
    }

    /// Get the phase at a given step number.
    pub fn phase_at(&self, step: u32) -> MotionPhase {
        if step >= self.total_steps {
            MotionPhase::Complete
        } else if step < self.accel_steps {
            MotionPhase::Accelerating
        } else if step < self.accel_steps + self.cruise_steps {
            MotionPhase::Cruising
        } else {
            MotionPhase::Decelerating
        }
    }

    /// Velocity (steps/sec, unsigned) while taking the given step.
    ///
    /// Uses `v = sqrt(2·a·n)` on the ramps, with `n` counted from the nearer
    /// end of the move (at least one step so the first and last step are finite).
    pub fn velocity_at(&self, step: u32) -> f32 {
        match self.phase_at(step) {
            MotionPhase::Complete => 0.0,
            MotionPhase::Cruising => self.cruise_velocity,
            MotionPhase::Accelerating => {
                let n = (step + 1) as f32;
                sqrtf(2.0 * self.accel_rate * n).min(self.cruise_velocity)
            }
            MotionPhase::Decelerating => {
                let n = (self.total_steps - step) as f32;
                sqrtf(2.0 * self.accel_rate * n).min(self.cruise_velocity)
            }
        }
    }

    /// Step interval in nanoseconds for a given step number.
    pub fn interval_at(&self, step: u32) -> u32 {
        let velocity = self.velocity_at(step);
        if velocity > 0.0 {
            (1_000_000_000.0 / velocity) as u32
        } else {
            u32::MAX
        }
    }

    /// Estimate total duration of the move in seconds.
    pub fn estimated_duration_secs(&self) -> f32 {
        if self.total_steps == 0 {
            return 0.0;
        }

        // Each ramp takes v/a; cruise takes d/v
        let ramp_time = self.cruise_velocity / self.accel_rate;
        let cruise_time = self.cruise_steps as f32 / self.cruise_velocity;

        2.0 * ramp_time + cruise_time
    }
}
