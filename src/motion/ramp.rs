//! Non-blocking S-curve ramp execution.

use crate::error::Result;
use crate::motor::{MotorDriverChip, StepperActuator};

use super::scurve::SCurveRamp;
use super::state::MotionContext;

/// Outcome of one scheduler tick of a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickStatus {
    /// Still running; tick again next iteration.
    InProgress,
    /// Finished normally.
    Done,
    /// Cut short by the safety latch (or a timeout).
    Aborted,
}

impl TickStatus {
    /// Whether the operation has ended, either way.
    #[inline]
    pub fn is_finished(self) -> bool {
        !matches!(self, TickStatus::InProgress)
    }
}

/// An S-curve ramp being driven onto the actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampExecutor {
    ramp: SCurveRamp,
    started_at_ms: u64,
}

impl RampExecutor {
    /// Begin a ramp at `now_ms`.
    pub fn start(from: f32, to: f32, duration_ms: u32, now_ms: u64) -> Self {
        debug!("ramp {} -> {} over {} ms", from, to, duration_ms);
        Self {
            ramp: SCurveRamp::new(from, to, duration_ms),
            started_at_ms: now_ms,
        }
    }

    /// Requested final speed.
    #[inline]
    pub fn target(&self) -> f32 {
        self.ramp.to
    }

    /// The underlying ramp.
    #[inline]
    pub fn ramp(&self) -> &SCurveRamp {
        &self.ramp
    }

    /// Drive one step of the ramp.
    ///
    /// The latch is checked first: if set, the pump is stopped, the driver
    /// disabled and `Aborted` returned without touching the ramp target.
    /// On completion the commanded speed is exactly the target (clamped to
    /// the working bound).
    pub fn tick<D, A>(&mut self, now_ms: u64, ctx: &mut MotionContext<'_, D, A>) -> Result<TickStatus>
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        if ctx.enforce_latch()? {
            debug!("ramp aborted by safety latch");
            return Ok(TickStatus::Aborted);
        }

        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        ctx.command_speed(self.ramp.speed_at(elapsed));

        if self.ramp.is_finished(elapsed) {
            Ok(TickStatus::Done)
        } else {
            Ok(TickStatus::InProgress)
        }
    }
}
