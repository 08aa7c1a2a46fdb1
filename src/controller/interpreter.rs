//! Command dispatch and the per-iteration scheduler step.

use core::fmt::Write;

use libm::fabsf;

use crate::config::units::{RevsPerSec, StepsPerSec};
use crate::config::{validate_config, MechanicalConstraints, ParseMode, SystemConfig};
use crate::error::{CommandError, Error, Result};
use crate::homing::{HomingPhase, HomingSequencer};
use crate::motion::{Direction, MotionContext, MotionState, RampExecutor, TickStatus};
use crate::motor::{LimitSwitch, MotorDriverChip, StepperActuator};
use crate::protocol::{parse_command, Command, StatusReporter};
use crate::safety::SafetyMonitor;

/// What to do once a jog ramp reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterRamp {
    /// Keep running at the target speed.
    Hold,
    /// Stop the actuator and disable the driver.
    StopAndDisable,
}

#[derive(Debug, Clone, Copy)]
struct Jog {
    ramp: RampExecutor,
    then: AfterRamp,
}

/// Everything a [`MotionContext`] borrows, kept apart from the controller's
/// other fields so both can be borrowed at once.
struct Axis<D, A> {
    state: MotionState,
    safety: SafetyMonitor,
    driver: D,
    actuator: A,
    constraints: MechanicalConstraints,
}

impl<D, A> Axis<D, A>
where
    D: MotorDriverChip,
    A: StepperActuator,
{
    fn ctx(&mut self) -> MotionContext<'_, D, A> {
        MotionContext {
            state: &mut self.state,
            safety: &mut self.safety,
            driver: &mut self.driver,
            actuator: &mut self.actuator,
            constraints: &self.constraints,
        }
    }
}

/// Syringe pump controller.
///
/// Owns all motion state. Each scheduler iteration calls
/// [`poll`](Controller::poll) with at most one received line; long
/// operations (jog ramps, homing) advance a little on every call, so
/// commands are accepted while they run.
pub struct Controller<D, A, L>
where
    D: MotorDriverChip,
    A: StepperActuator,
    L: LimitSwitch,
{
    axis: Axis<D, A>,
    switch: L,
    homing: HomingSequencer,
    reporter: StatusReporter,
    jog: Option<Jog>,
    jog_ramp_ms: u32,
    parse_mode: ParseMode,
}

impl<D, A, L> Controller<D, A, L>
where
    D: MotorDriverChip,
    A: StepperActuator,
    L: LimitSwitch,
{
    /// Build a controller from configuration.
    ///
    /// Validates the configuration, sets the driver run current and the
    /// actuator's positioning limits. The driver is left disabled.
    pub fn new(config: &SystemConfig, mut driver: D, mut actuator: A, switch: L) -> Result<Self> {
        validate_config(config)?;

        let constraints = MechanicalConstraints::from_config(config);
        driver.set_run_current(config.motor.run_current_ma)?;
        actuator.set_max_speed(constraints.max_speed_steps_per_sec);
        actuator.set_acceleration(constraints.acceleration_steps_per_sec2);

        info!(
            "controller ready: {} steps/rev, max {} steps/s",
            constraints.steps_per_revolution,
            constraints.max_speed_steps_per_sec
        );

        let homing = HomingSequencer::new(constraints.homing_plan(&config.homing));
        let state = MotionState::new(&constraints, config.jog.speed);

        Ok(Self {
            axis: Axis {
                state,
                safety: SafetyMonitor::new(),
                driver,
                actuator,
                constraints,
            },
            switch,
            homing,
            reporter: StatusReporter::new(config.telemetry.interval_ms),
            jog: None,
            jog_ramp_ms: config.jog.ramp_ms,
            parse_mode: config.protocol.parse_mode,
        })
    }

    /// One scheduler iteration.
    ///
    /// In order: dispatch `line` (if any), advance the active jog ramp or
    /// homing run, re-assert the safety latch, integrate the actuator,
    /// publish the position and write telemetry to `out` when due.
    ///
    /// Rejected commands are silent in permissive mode and answered with an
    /// `ERR <reason>` line in strict mode. Driver failures are returned, but
    /// only after the whole iteration has run; the first failure wins.
    pub fn poll<W: Write>(&mut self, now_ms: u64, line: Option<&str>, out: &mut W) -> Result<()> {
        let mut dispatched = Ok(());
        if let Some(line) = line.map(str::trim).filter(|l| !l.is_empty()) {
            let outcome = parse_command(line, self.parse_mode)
                .map_err(Error::from)
                .and_then(|cmd| self.dispatch(cmd, now_ms));
            dispatched = match outcome {
                Err(Error::Command(e)) => self.reject(&e, out),
                other => other,
            };
        }

        let ticked = self.tick_active(now_ms);
        let enforced = self.axis.ctx().enforce_latch().map(|_| ());

        self.axis.actuator.poll(now_ms);
        self.axis.state.position_steps = self.axis.actuator.current_position();

        let reported = self
            .reporter
            .poll(
                now_ms,
                self.axis.state.position_steps,
                self.axis
                    .constraints
                    .steps_to_revs(StepsPerSec(self.axis.actuator.speed())),
                out,
            )
            .map(|_| ());

        dispatched.and(ticked).and(enforced).and(reported)
    }

    /// Apply one command.
    ///
    /// Rejections come back as [`Error::Command`]; driver failures as
    /// [`Error::Motor`].
    pub fn dispatch(&mut self, cmd: Command, now_ms: u64) -> Result<()> {
        debug!("dispatch {}", cmd.verb());

        if self.homing.is_active() && !matches!(cmd, Command::EStop | Command::SetJogSpeed(_)) {
            return Err(CommandError::Busy.into());
        }

        let latched = self.axis.safety.is_tripped();
        let refused_when_latched = matches!(
            cmd,
            Command::Start | Command::JogForward | Command::JogBackward | Command::Home | Command::Enable
        );
        if latched && refused_when_latched {
            return Err(CommandError::SafetyLatched.into());
        }

        match cmd {
            Command::SetSpeed(speed) => {
                let speed = speed.unwrap_or(self.axis.state.target_speed);
                self.jog = None;
                self.axis.state.set_max_speed(speed);
                self.axis.state.target_speed = speed;
                self.axis.actuator.set_max_speed(self.axis.state.max_speed);
                if !latched {
                    self.axis.ctx().command_speed(speed);
                }
            }
            Command::Start => {
                self.jog = None;
                self.axis.driver.enable()?;
                let target = self.axis.state.target_speed;
                self.axis.ctx().command_speed(target);
            }
            Command::Stop => {
                self.jog = None;
                self.axis.ctx().halt();
                self.axis.driver.disable()?;
            }
            Command::JogForward => self.start_jog(Direction::Forward, now_ms)?,
            Command::JogBackward => self.start_jog(Direction::Backward, now_ms)?,
            Command::StopJog => {
                let from = self.axis.state.current_speed;
                self.jog = Some(Jog {
                    ramp: RampExecutor::start(from, 0.0, self.jog_ramp_ms, now_ms),
                    then: AfterRamp::StopAndDisable,
                });
            }
            Command::Home => {
                self.jog = None;
                self.homing.start(now_ms, &mut self.axis.ctx())?;
            }
            Command::EStop => {
                self.jog = None;
                self.homing.abort_by_estop();
                self.axis.ctx().trip()?;
            }
            Command::Enable => self.axis.driver.enable()?,
            Command::Disable => self.axis.driver.disable()?,
            Command::ResetPositionToZero => {
                // Redefining the position also drops the commanded speed
                self.jog = None;
                self.axis.ctx().halt();
                self.axis.actuator.set_current_position(0);
                self.axis.state.position_steps = 0;
            }
            Command::SetJogSpeed(speed) => {
                if let Some(speed) = speed {
                    self.axis.state.jog_speed = RevsPerSec(fabsf(speed));
                }
            }
            Command::Unrecognized(text) => {
                debug!("ignoring unrecognized line '{}'", text.as_str());
            }
        }

        Ok(())
    }

    /// Clear the safety latch.
    ///
    /// Not reachable from the command protocol. The pump stays stopped with
    /// the driver disabled until the host commands motion again.
    pub fn rearm(&mut self) -> bool {
        self.axis.safety.rearm()
    }

    /// Commanded motion parameters.
    #[inline]
    pub fn state(&self) -> &MotionState {
        &self.axis.state
    }

    /// Whether the safety latch is set.
    #[inline]
    pub fn is_latched(&self) -> bool {
        self.axis.safety.is_tripped()
    }

    /// The safety latch.
    #[inline]
    pub fn safety(&self) -> &SafetyMonitor {
        &self.axis.safety
    }

    /// Phase of the current or most recent homing run.
    #[inline]
    pub fn homing_phase(&self) -> HomingPhase {
        self.homing.phase()
    }

    /// Target speed of the running jog ramp, if one is running.
    #[inline]
    pub fn jog_target(&self) -> Option<f32> {
        self.jog.map(|jog| jog.ramp.target())
    }

    /// Derived drive-train constants.
    #[inline]
    pub fn constraints(&self) -> &MechanicalConstraints {
        &self.axis.constraints
    }

    /// Parser strictness in effect.
    #[inline]
    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    /// The driver chip.
    #[inline]
    pub fn driver(&self) -> &D {
        &self.axis.driver
    }

    /// The driver chip, mutably.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.axis.driver
    }

    /// The step generator.
    #[inline]
    pub fn actuator(&self) -> &A {
        &self.axis.actuator
    }

    /// The limit switch.
    #[inline]
    pub fn switch_mut(&mut self) -> &mut L {
        &mut self.switch
    }

    /// Release the hardware.
    pub fn into_parts(self) -> (D, A, L) {
        (self.axis.driver, self.axis.actuator, self.switch)
    }

    fn start_jog(&mut self, direction: Direction, now_ms: u64) -> Result<()> {
        self.axis.driver.enable()?;
        let rate = self.axis.constraints.revs_to_steps(self.axis.state.jog_speed);
        let target = direction.apply(rate.value());
        let from = self.axis.state.current_speed;
        self.jog = Some(Jog {
            ramp: RampExecutor::start(from, target, self.jog_ramp_ms, now_ms),
            then: AfterRamp::Hold,
        });
        Ok(())
    }

    /// Advance whichever long operation is running. Jogs and homing runs
    /// never overlap.
    fn tick_active(&mut self, now_ms: u64) -> Result<()> {
        self.tick_jog(now_ms)?;
        if self.homing.is_active() {
            self.homing
                .tick(now_ms, &mut self.axis.ctx(), &mut self.switch)?;
        }
        Ok(())
    }

    fn tick_jog(&mut self, now_ms: u64) -> Result<()> {
        let Some(jog) = self.jog.as_mut() else {
            return Ok(());
        };

        let then = jog.then;
        match jog.ramp.tick(now_ms, &mut self.axis.ctx())? {
            TickStatus::InProgress => {}
            TickStatus::Done => {
                self.jog = None;
                if then == AfterRamp::StopAndDisable {
                    self.axis.ctx().halt();
                    self.axis.driver.disable()?;
                }
            }
            TickStatus::Aborted => self.jog = None,
        }
        Ok(())
    }

    fn reject<W: Write>(&self, error: &CommandError, out: &mut W) -> Result<()> {
        warn!("command rejected: {}", error);
        if self.parse_mode == ParseMode::Strict {
            write!(out, "ERR {}\r\n", error)?;
        }
        Ok(())
    }
}
