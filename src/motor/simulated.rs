//! Simulated hardware backends.
//!
//! Lets the controller run on a host without a motor attached: the stepper
//! integrates time into position exactly as the real step generator would,
//! and the switch is driven from a position threshold or by hand.

use crate::config::units::Steps;
use crate::error::{MotorError, Result};
use crate::motion::{StepExecutor, TrapezoidalProfile};

use super::actuator::StepperActuator;
use super::driver::MotorDriverChip;
use super::limit_switch::LimitSwitch;
use super::position::Position;

/// Software stepper that integrates commanded motion over time.
#[derive(Debug, Clone)]
pub struct SimulatedStepper {
    position: Position,
    speed: f32,
    max_speed: f32,
    acceleration: f32,
    /// Active positioning move, if any
    executor: Option<StepExecutor>,
    last_poll_ms: Option<u64>,
}

impl SimulatedStepper {
    /// Create a stepper at position 0 with the given positioning limits.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        Self {
            position: Position::new(),
            speed: 0.0,
            max_speed,
            acceleration,
            executor: None,
            last_poll_ms: None,
        }
    }

    /// Whether a positioning move is in progress.
    #[inline]
    pub fn is_positioning(&self) -> bool {
        self.executor.is_some()
    }
}

impl StepperActuator for SimulatedStepper {
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.max_speed = steps_per_sec;
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.acceleration = steps_per_sec2;
    }

    fn set_speed(&mut self, steps_per_sec: f32) {
        self.executor = None;
        self.speed = steps_per_sec;
    }

    fn speed(&self) -> f32 {
        match &self.executor {
            Some(executor) => executor.profile().direction.apply(executor.current_velocity()),
            None => self.speed,
        }
    }

    fn move_relative(&mut self, steps: i64) {
        self.speed = 0.0;
        let profile = TrapezoidalProfile::new(steps, self.max_speed, self.acceleration);
        self.executor = if profile.is_zero() {
            None
        } else {
            Some(StepExecutor::new(profile))
        };
    }

    fn distance_to_go(&self) -> i64 {
        self.executor
            .as_ref()
            .map(|e| e.steps_remaining() as i64 * e.profile().direction.sign())
            .unwrap_or(0)
    }

    fn current_position(&self) -> i64 {
        self.position.steps().value()
    }

    fn set_current_position(&mut self, steps: i64) {
        self.executor = None;
        self.speed = 0.0;
        self.position.set_steps(Steps(steps));
    }

    fn stop(&mut self) {
        self.executor = None;
        self.speed = 0.0;
    }

    fn poll(&mut self, now_ms: u64) {
        let dt_ms = match self.last_poll_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_poll_ms = Some(now_ms);

        if dt_ms == 0 {
            return;
        }

        match self.executor.as_mut() {
            Some(executor) => {
                let sign = executor.profile().direction.sign();
                let taken = executor.elapse(dt_ms.saturating_mul(1_000_000));
                self.position.move_steps(taken as i64 * sign);
                if executor.is_complete() {
                    self.executor = None;
                    self.speed = 0.0;
                }
            }
            None => {
                let dt = dt_ms.min(u32::MAX as u64) as u32;
                self.position.integrate(self.speed, dt);
            }
        }
    }
}

/// Driver stand-in that records power-stage requests.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDriver {
    enabled: bool,
    run_current_ma: u16,
    enable_count: u32,
    /// When set, every request fails with a driver fault
    faulted: bool,
}

impl SimulatedDriver {
    /// Create a disabled driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last requested run current.
    pub fn run_current_ma(&self) -> u16 {
        self.run_current_ma
    }

    /// Number of successful `enable` calls.
    pub fn enable_count(&self) -> u32 {
        self.enable_count
    }

    /// Make subsequent requests fail.
    pub fn set_faulted(&mut self, faulted: bool) {
        self.faulted = faulted;
    }

    fn check(&self) -> Result<()> {
        if self.faulted {
            return Err(MotorError::DriverFault.into());
        }
        Ok(())
    }
}

impl MotorDriverChip for SimulatedDriver {
    fn enable(&mut self) -> Result<()> {
        self.check()?;
        self.enabled = true;
        self.enable_count += 1;
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.check()?;
        self.enabled = false;
        Ok(())
    }

    fn set_run_current(&mut self, milliamps: u16) -> Result<()> {
        self.check()?;
        self.run_current_ma = milliamps;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Limit switch stand-in, pressed by hand or at a position threshold.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSwitch {
    pressed: bool,
}

impl SimulatedSwitch {
    /// Create a released switch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the switch state.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Press the switch when `position` is at or below `trigger_at`.
    pub fn track(&mut self, position: i64, trigger_at: i64) {
        self.pressed = position <= trigger_at;
    }
}

impl LimitSwitch for SimulatedSwitch {
    fn is_pressed(&mut self) -> Result<bool> {
        Ok(self.pressed)
    }
}
