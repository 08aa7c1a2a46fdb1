//! Three-phase homing state machine.

use crate::config::HomingPlan;
use crate::error::{CommandError, Result};
use crate::motion::{MotionContext, RampExecutor, TickStatus};
use crate::motor::{LimitSwitch, MotorDriverChip, StepperActuator};

/// Where a homing run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Never started.
    #[default]
    Idle,
    /// Fast approach toward the switch.
    SeekCoarse,
    /// Backing off the switch.
    Retract,
    /// Slow approach toward the switch.
    SeekFine,
    /// Finished; position 0 is at the switch.
    Homed,
    /// Cut short by the safety latch.
    AbortedByEstop,
    /// A seek ran past its timeout without reaching the switch.
    TimedOut,
}

impl HomingPhase {
    /// Whether a run is in progress.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            HomingPhase::SeekCoarse | HomingPhase::Retract | HomingPhase::SeekFine
        )
    }

    /// Whether a new run may be started from this phase.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// Sub-step inside a phase.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Easing into the seek speed.
    Ramp(RampExecutor),
    /// Holding the seek speed.
    Cruise,
    /// Positioning move in flight.
    Travel,
    /// Settling after a stop.
    Dwell { until_ms: u64 },
}

/// Non-blocking homing run.
///
/// Ticked once per scheduler iteration. The limit switch is sampled on every
/// seek tick, including while the seek ramp is still accelerating.
#[derive(Debug, Clone)]
pub struct HomingSequencer {
    plan: HomingPlan,
    phase: HomingPhase,
    step: Step,
    seek_started_ms: u64,
}

impl HomingSequencer {
    /// Create an idle sequencer.
    pub fn new(plan: HomingPlan) -> Self {
        Self {
            plan,
            phase: HomingPhase::Idle,
            step: Step::Cruise,
            seek_started_ms: 0,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> HomingPhase {
        self.phase
    }

    /// Whether a run is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// The parameters this sequencer runs with.
    #[inline]
    pub fn plan(&self) -> &HomingPlan {
        &self.plan
    }

    /// Begin a run: enable the driver and start the coarse seek ramp.
    ///
    /// Fails with [`CommandError::Busy`] if a run is already in progress.
    pub fn start<D, A>(&mut self, now_ms: u64, ctx: &mut MotionContext<'_, D, A>) -> Result<()>
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        if !self.phase.is_terminal() {
            return Err(CommandError::Busy.into());
        }

        ctx.driver.enable()?;
        self.begin_seek(
            HomingPhase::SeekCoarse,
            self.plan.coarse_speed,
            self.plan.coarse_ramp_ms,
            now_ms,
            ctx.state.current_speed,
        );
        Ok(())
    }

    /// Mark an in-progress run as aborted by the safety latch.
    ///
    /// Motion and driver are handled by the latch itself.
    pub fn abort_by_estop(&mut self) {
        if self.is_active() {
            self.enter(HomingPhase::AbortedByEstop);
            self.step = Step::Cruise;
        }
    }

    /// Advance the run by one iteration.
    ///
    /// Returns `InProgress` while running, `Done` once homed and `Aborted` on
    /// an e-stop or seek timeout. Ticking a finished run reports how it ended.
    pub fn tick<D, A, L>(
        &mut self,
        now_ms: u64,
        ctx: &mut MotionContext<'_, D, A>,
        switch: &mut L,
    ) -> Result<TickStatus>
    where
        D: MotorDriverChip,
        A: StepperActuator,
        L: LimitSwitch,
    {
        if !self.is_active() {
            return Ok(match self.phase {
                HomingPhase::AbortedByEstop | HomingPhase::TimedOut => TickStatus::Aborted,
                _ => TickStatus::Done,
            });
        }

        if ctx.safety.is_tripped() {
            // Phase first, so a failing driver cannot leave the run active
            self.abort_by_estop();
            ctx.enforce_latch()?;
            return Ok(TickStatus::Aborted);
        }

        match self.phase {
            HomingPhase::SeekCoarse | HomingPhase::SeekFine => self.tick_seek(now_ms, ctx, switch),
            HomingPhase::Retract => self.tick_retract(now_ms, ctx),
            _ => Ok(TickStatus::Done),
        }
    }

    fn tick_seek<D, A, L>(
        &mut self,
        now_ms: u64,
        ctx: &mut MotionContext<'_, D, A>,
        switch: &mut L,
    ) -> Result<TickStatus>
    where
        D: MotorDriverChip,
        A: StepperActuator,
        L: LimitSwitch,
    {
        match self.step {
            Step::Dwell { until_ms } => {
                if now_ms < until_ms {
                    return Ok(TickStatus::InProgress);
                }
                if self.phase == HomingPhase::SeekCoarse {
                    self.begin_retract(now_ms, ctx);
                    Ok(TickStatus::InProgress)
                } else {
                    self.finish(ctx)
                }
            }
            Step::Ramp(_) | Step::Cruise => {
                if switch.is_pressed()? {
                    debug!("limit switch reached at {}", ctx.actuator.current_position());
                    ctx.halt();
                    self.step = Step::Dwell {
                        until_ms: now_ms + self.plan.dwell_ms as u64,
                    };
                    return Ok(TickStatus::InProgress);
                }

                if let Some(timeout) = self.plan.seek_timeout_ms {
                    if now_ms.saturating_sub(self.seek_started_ms) >= timeout as u64 {
                        warn!("homing seek timed out after {} ms", timeout);
                        ctx.halt();
                        ctx.driver.disable()?;
                        self.enter(HomingPhase::TimedOut);
                        return Ok(TickStatus::Aborted);
                    }
                }

                if let Step::Ramp(ref mut ramp) = self.step {
                    match ramp.tick(now_ms, ctx)? {
                        TickStatus::Done => self.step = Step::Cruise,
                        TickStatus::Aborted => {
                            self.abort_by_estop();
                            return Ok(TickStatus::Aborted);
                        }
                        TickStatus::InProgress => {}
                    }
                }
                Ok(TickStatus::InProgress)
            }
            Step::Travel => Ok(TickStatus::InProgress),
        }
    }

    fn tick_retract<D, A>(&mut self, now_ms: u64, ctx: &mut MotionContext<'_, D, A>) -> Result<TickStatus>
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        match self.step {
            Step::Travel => {
                if ctx.actuator.distance_to_go() == 0 {
                    ctx.halt();
                    self.step = Step::Dwell {
                        until_ms: now_ms + self.plan.dwell_ms as u64,
                    };
                }
            }
            Step::Dwell { until_ms } if now_ms >= until_ms => {
                self.begin_seek(
                    HomingPhase::SeekFine,
                    self.plan.fine_speed,
                    self.plan.fine_ramp_ms,
                    now_ms,
                    ctx.state.current_speed,
                );
            }
            _ => {}
        }
        Ok(TickStatus::InProgress)
    }

    fn begin_seek(&mut self, phase: HomingPhase, speed: f32, ramp_ms: u32, now_ms: u64, from: f32) {
        self.enter(phase);
        self.step = Step::Ramp(RampExecutor::start(from, speed, ramp_ms, now_ms));
        self.seek_started_ms = now_ms;
    }

    fn begin_retract<D, A>(&mut self, now_ms: u64, ctx: &mut MotionContext<'_, D, A>)
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        self.enter(HomingPhase::Retract);
        ctx.actuator.set_max_speed(ctx.state.max_speed);
        ctx.actuator.set_acceleration(ctx.state.acceleration);
        ctx.actuator.move_relative(self.plan.retract_steps);
        self.step = if ctx.actuator.distance_to_go() == 0 {
            Step::Dwell {
                until_ms: now_ms + self.plan.dwell_ms as u64,
            }
        } else {
            Step::Travel
        };
    }

    fn finish<D, A>(&mut self, ctx: &mut MotionContext<'_, D, A>) -> Result<TickStatus>
    where
        D: MotorDriverChip,
        A: StepperActuator,
    {
        ctx.halt();
        ctx.actuator.set_current_position(0);
        ctx.state.position_steps = 0;
        ctx.driver.disable()?;
        self.enter(HomingPhase::Homed);
        Ok(TickStatus::Done)
    }

    fn enter(&mut self, phase: HomingPhase) {
        info!("homing: {} -> {}", self.phase, phase);
        self.phase = phase;
    }
}
