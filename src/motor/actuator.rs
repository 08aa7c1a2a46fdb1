//! Step-generating actuator capability.

/// Integrates commanded motion into step pulses.
///
/// The actuator has two modes, mirroring the classic AccelStepper split:
///
/// - velocity mode, entered by [`set_speed`](StepperActuator::set_speed): steps
///   at a constant signed rate until told otherwise;
/// - positioning mode, entered by [`move_relative`](StepperActuator::move_relative):
///   runs its own trapezoidal profile to the target and stops there.
///
/// [`poll`](StepperActuator::poll) must be called every scheduler iteration in
/// either mode.
pub trait StepperActuator {
    /// Upper bound for positioning moves, in steps/s.
    fn set_max_speed(&mut self, steps_per_sec: f32);

    /// Acceleration for positioning moves, in steps/s².
    fn set_acceleration(&mut self, steps_per_sec2: f32);

    /// Switch to velocity mode at a signed rate.
    fn set_speed(&mut self, steps_per_sec: f32);

    /// Current signed step rate.
    fn speed(&self) -> f32;

    /// Switch to positioning mode and travel `steps` relative to the current position.
    fn move_relative(&mut self, steps: i64);

    /// Steps remaining in the current positioning move (0 in velocity mode).
    fn distance_to_go(&self) -> i64;

    /// Accumulated position in steps.
    fn current_position(&self) -> i64;

    /// Redefine the current position without moving; cancels any positioning move.
    fn set_current_position(&mut self, steps: i64);

    /// Stop immediately: speed 0, no pending move.
    fn stop(&mut self);

    /// Emit the steps due at `now_ms`.
    fn poll(&mut self, now_ms: u64);
}
