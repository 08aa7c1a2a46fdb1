//! Shared motion state and the context handed to every motion operation.

use libm::fabsf;

use crate::config::MechanicalConstraints;
use crate::config::units::RevsPerSec;
use crate::error::Result;
use crate::motor::{MotorDriverChip, StepperActuator};
use crate::safety::SafetyMonitor;

/// Commanded motion parameters of the pump.
///
/// Invariant: `|current_speed| <= max_speed` whenever it is observed; every
/// write goes through [`MotionState::clamp_speed`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionState {
    /// Commanded signed speed, steps/s.
    pub current_speed: f32,
    /// Working speed bound, steps/s.
    pub max_speed: f32,
    /// Hardware speed ceiling, steps/s; `max_speed` never exceeds it.
    pub speed_ceiling: f32,
    /// Acceleration for positioning moves, steps/s².
    pub acceleration: f32,
    /// Last position read back from the actuator, steps.
    pub position_steps: i64,
    /// Jog speed, rev/s (unsigned).
    pub jog_speed: RevsPerSec,
    /// Speed stored by `SET_SPEED` and resumed by `START`, steps/s.
    pub target_speed: f32,
}

impl MotionState {
    /// Initial state from the derived constants and the configured jog speed.
    pub fn new(constraints: &MechanicalConstraints, jog_speed: RevsPerSec) -> Self {
        Self {
            current_speed: 0.0,
            max_speed: constraints.max_speed_steps_per_sec,
            speed_ceiling: constraints.max_speed_steps_per_sec,
            acceleration: constraints.acceleration_steps_per_sec2,
            position_steps: 0,
            jog_speed,
            target_speed: 0.0,
        }
    }

    /// Limit a signed speed to `±max_speed`. Non-finite input becomes 0.
    #[inline]
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        if !speed.is_finite() {
            return 0.0;
        }
        speed.max(-self.max_speed).min(self.max_speed)
    }

    /// Set the working bound to `|speed|`, capped at the hardware ceiling.
    ///
    /// A zero speed leaves the bound unchanged so a `SET_SPEED 0` does not
    /// lock out jogging and homing.
    pub fn set_max_speed(&mut self, speed: f32) {
        let magnitude = fabsf(speed);
        if magnitude > 0.0 && magnitude.is_finite() {
            self.max_speed = magnitude.min(self.speed_ceiling);
            self.current_speed = self.clamp_speed(self.current_speed);
        }
    }
}

/// Mutable view over everything a motion operation may touch.
///
/// Built fresh by the controller for each call so no component holds on to
/// shared state between iterations.
pub struct MotionContext<'a, D, A>
where
    D: MotorDriverChip,
    A: StepperActuator,
{
    /// Commanded motion parameters.
    pub state: &'a mut MotionState,
    /// Emergency-stop latch.
    pub safety: &'a mut SafetyMonitor,
    /// Driver power stage.
    pub driver: &'a mut D,
    /// Step generator.
    pub actuator: &'a mut A,
    /// Derived drive-train constants.
    pub constraints: &'a MechanicalConstraints,
}

impl<'a, D, A> MotionContext<'a, D, A>
where
    D: MotorDriverChip,
    A: StepperActuator,
{
    /// Command a signed speed, clamped to the working bound.
    ///
    /// Returns the speed actually commanded.
    pub fn command_speed(&mut self, speed: f32) -> f32 {
        let speed = self.state.clamp_speed(speed);
        self.state.current_speed = speed;
        self.actuator.set_speed(speed);
        speed
    }

    /// Zero the commanded speed and drop any pending positioning move.
    pub fn halt(&mut self) {
        self.state.current_speed = 0.0;
        self.actuator.stop();
    }

    /// Trip the safety latch.
    pub fn trip(&mut self) -> Result<()> {
        self.safety
            .trigger(&mut *self.state, &mut *self.driver, &mut *self.actuator)
    }

    /// Re-assert the latched outputs if the latch is set.
    ///
    /// Returns whether the latch is set.
    pub fn enforce_latch(&mut self) -> Result<bool> {
        self.safety
            .enforce(&mut *self.state, &mut *self.driver, &mut *self.actuator)
    }
}
