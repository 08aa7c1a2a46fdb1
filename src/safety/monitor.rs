//! Safety latch implementation.
//!
//! Once tripped the latch stays set: nothing in the command protocol clears
//! it. While set, commanded speed is pinned to zero and the driver is kept
//! disabled.

use crate::error::Result;
use crate::motion::MotionState;
use crate::motor::{MotorDriverChip, StepperActuator};

/// Sticky emergency-stop latch.
#[derive(Debug, Clone, Default)]
pub struct SafetyMonitor {
    /// Latch state
    tripped: bool,
    /// Number of trips since power-up, including repeats while latched
    trip_count: u32,
}

impl SafetyMonitor {
    /// Create an un-tripped monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the latch is set.
    #[inline]
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Number of times `trigger` has been called.
    #[inline]
    pub fn trip_count(&self) -> u32 {
        self.trip_count
    }

    /// Set the latch, stop the actuator and disable the driver.
    ///
    /// Idempotent. The latch is set and motion zeroed before the driver is
    /// touched, so a failing driver still leaves the pump commanded to rest.
    pub fn trigger<D, A>(&mut self, state: &mut MotionState, driver: &mut D, actuator: &mut A) -> Result<()>
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        if !self.tripped {
            warn!("safety latch tripped");
        }
        self.tripped = true;
        self.trip_count = self.trip_count.saturating_add(1);
        self.enforce(state, driver, actuator).map(|_| ())
    }

    /// Re-assert zero speed and a disabled driver if the latch is set.
    ///
    /// Returns whether the latch is set.
    pub fn enforce<D, A>(&self, state: &mut MotionState, driver: &mut D, actuator: &mut A) -> Result<bool>
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        if !self.tripped {
            return Ok(false);
        }

        state.current_speed = 0.0;
        if actuator.speed() != 0.0 || actuator.distance_to_go() != 0 {
            actuator.stop();
        }
        if driver.is_enabled() {
            driver.disable()?;
        }

        Ok(true)
    }

    /// Clear the latch.
    ///
    /// Not reachable from the command protocol; the host cannot re-arm a
    /// tripped pump. Firmware may call this from a physical reset input.
    /// Motion stays stopped and the driver disabled until new commands arrive.
    pub fn rearm(&mut self) -> bool {
        let was_tripped = self.tripped;
        if was_tripped {
            info!("safety latch re-armed");
        }
        self.tripped = false;
        was_tripped
    }
}
