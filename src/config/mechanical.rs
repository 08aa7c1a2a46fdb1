//! Mechanical constants derived from configuration.

use super::homing::HomingConfig;
use super::system::SystemConfig;
use super::units::{RevsPerSec, Steps, StepsPerSec};

/// Derived drive-train parameters computed from configuration.
///
/// These are computed once at startup and used for every speed conversion.
#[derive(Debug, Clone)]
pub struct MechanicalConstraints {
    /// Total steps per shaft revolution (steps × microsteps).
    pub steps_per_revolution: u32,

    /// Hardware speed ceiling in steps per second.
    pub max_speed_steps_per_sec: f32,

    /// Acceleration in steps per second squared.
    pub acceleration_steps_per_sec2: f32,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from the system configuration.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            steps_per_revolution: config.motor.total_steps_per_revolution(),
            max_speed_steps_per_sec: config.motor.max_speed.value(),
            acceleration_steps_per_sec2: config.motor.acceleration.value(),
        }
    }

    /// Convert rev/s to steps/s.
    #[inline]
    pub fn revs_to_steps(&self, rate: RevsPerSec) -> StepsPerSec {
        rate.to_steps_per_sec(self.steps_per_revolution)
    }

    /// Convert steps/s to rev/s.
    #[inline]
    pub fn steps_to_revs(&self, rate: StepsPerSec) -> RevsPerSec {
        rate.to_revs_per_sec(self.steps_per_revolution)
    }

    /// Convert revolutions to a step count.
    #[inline]
    pub fn revolutions_to_steps(&self, revs: f32) -> Steps {
        Steps::from_revolutions(revs, self.steps_per_revolution)
    }

    /// Homing speeds and distances converted to steps.
    pub fn homing_plan(&self, homing: &HomingConfig) -> HomingPlan {
        HomingPlan {
            coarse_speed: -self.revs_to_steps(homing.coarse_speed).value(),
            coarse_ramp_ms: homing.coarse_ramp_ms,
            retract_steps: self.revolutions_to_steps(homing.retract_revolutions).value(),
            fine_speed: -self.revs_to_steps(homing.fine_speed).value(),
            fine_ramp_ms: homing.fine_ramp_ms,
            dwell_ms: homing.dwell_ms,
            seek_timeout_ms: homing.seek_timeout_ms,
        }
    }
}

/// Homing parameters in actuator units (steps, steps/s, signed toward the switch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingPlan {
    /// Coarse seek speed (negative).
    pub coarse_speed: f32,
    /// Ramp time into the coarse seek.
    pub coarse_ramp_ms: u32,
    /// Relative back-off move (positive).
    pub retract_steps: i64,
    /// Fine seek speed (negative).
    pub fine_speed: f32,
    /// Ramp time into the fine seek.
    pub fine_ramp_ms: u32,
    /// Settle time after each stop.
    pub dwell_ms: u32,
    /// Optional seek timeout.
    pub seek_timeout_ms: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_per_revolution() {
        let constraints = MechanicalConstraints::from_config(&SystemConfig::default());

        // 200 * 16 = 3200
        assert_eq!(constraints.steps_per_revolution, 3200);
        assert_eq!(constraints.max_speed_steps_per_sec, 20_000.0);
    }

    #[test]
    fn test_default_homing_plan() {
        let config = SystemConfig::default();
        let plan = MechanicalConstraints::from_config(&config).homing_plan(&config.homing);

        assert_eq!(plan.coarse_speed, -16_000.0);
        assert_eq!(plan.coarse_ramp_ms, 2000);
        assert_eq!(plan.retract_steps, 6400);
        assert_eq!(plan.fine_speed, -3200.0);
        assert_eq!(plan.fine_ramp_ms, 1000);
        assert_eq!(plan.dwell_ms, 500);
        assert_eq!(plan.seek_timeout_ms, None);
    }
}
