//! Positioning move execution - step scheduling against elapsed time.

use super::profile::{MotionPhase, TrapezoidalProfile};

/// Runtime state of a positioning move.
#[derive(Debug, Clone)]
pub struct StepExecutor {
    /// The computed profile being executed.
    profile: TrapezoidalProfile,

    /// Current step number (0 to total_steps).
    current_step: u32,

    /// Interval before the next step, in nanoseconds.
    current_interval_ns: u32,

    /// Time accumulated toward the next step, in nanoseconds.
    pending_ns: u64,

    /// Current phase of motion.
    phase: MotionPhase,
}

impl StepExecutor {
    /// Create a new executor for a profile.
    pub fn new(profile: TrapezoidalProfile) -> Self {
        let (phase, interval) = if profile.is_zero() {
            (MotionPhase::Complete, u32::MAX)
        } else {
            (MotionPhase::Accelerating, profile.interval_at(0))
        };

        Self {
            profile,
            current_step: 0,
            current_interval_ns: interval,
            pending_ns: 0,
            phase,
        }
    }

    /// Check if motion is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == MotionPhase::Complete
    }

    /// Get the current step number.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.profile.total_steps.saturating_sub(self.current_step)
    }

    /// Get the current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Get the motion profile.
    #[inline]
    pub fn profile(&self) -> &TrapezoidalProfile {
        &self.profile
    }

    /// Unsigned velocity of the step currently being timed, in steps/sec.
    #[inline]
    pub fn current_velocity(&self) -> f32 {
        if self.is_complete() {
            0.0
        } else {
            self.profile.velocity_at(self.current_step)
        }
    }

    /// Advance to the next step.
    ///
    /// Returns `true` if more steps remain, `false` once complete.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }

        self.current_step += 1;

        if self.current_step >= self.profile.total_steps {
            self.phase = MotionPhase::Complete;
            self.current_interval_ns = u32::MAX;
            return false;
        }

        self.phase = self.profile.phase_at(self.current_step);
        self.current_interval_ns = self.profile.interval_at(self.current_step);

        true
    }

    /// Account for `elapsed_ns` of wall time.
    ///
    /// Returns the number of steps that fell due.
    pub fn elapse(&mut self, elapsed_ns: u64) -> u32 {
        if self.is_complete() {
            return 0;
        }

        self.pending_ns = self.pending_ns.saturating_add(elapsed_ns);

        let mut taken = 0;
        while !self.is_complete() && self.pending_ns >= self.current_interval_ns as u64 {
            self.pending_ns -= self.current_interval_ns as u64;
            self.advance();
            taken += 1;
        }

        if self.is_complete() {
            self.pending_ns = 0;
        }

        taken
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.profile.total_steps == 0 {
            1.0
        } else {
            self.current_step as f32 / self.profile.total_steps as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_complete() {
        let profile = TrapezoidalProfile::new(10, 1000.0, 2000.0);
        let mut executor = StepExecutor::new(profile);

        assert!(!executor.is_complete());
        assert_eq!(executor.current_step(), 0);

        while executor.advance() {}

        assert!(executor.is_complete());
        assert_eq!(executor.current_step(), 10);
        assert_eq!(executor.progress(), 1.0);
    }

    #[test]
    fn test_zero_profile() {
        let executor = StepExecutor::new(TrapezoidalProfile::zero());

        assert!(executor.is_complete());
        assert_eq!(executor.steps_remaining(), 0);
        assert_eq!(executor.current_velocity(), 0.0);
    }

    #[test]
    fn test_phase_transitions() {
        let profile = TrapezoidalProfile::new(10_000, 1000.0, 2000.0);
        let mut executor = StepExecutor::new(profile);

        let mut saw_accel = false;
        let mut saw_cruise = false;
        let mut saw_decel = false;

        while !executor.is_complete() {
            match executor.phase() {
                MotionPhase::Accelerating => saw_accel = true,
                MotionPhase::Cruising => saw_cruise = true,
                MotionPhase::Decelerating => saw_decel = true,
                MotionPhase::Complete => {}
            }
            executor.advance();
        }

        assert!(saw_accel);
        assert!(saw_cruise);
        assert!(saw_decel);
    }

    #[test]
    fn test_elapse_takes_due_steps() {
        // 1000 steps/s cruise is one step per millisecond
        let profile = TrapezoidalProfile::new(10_000, 1000.0, 2000.0);
        let mut executor = StepExecutor::new(profile);

        let mut taken = 0u32;
        let mut elapsed_ms = 0u32;
        while !executor.is_complete() {
            taken += executor.elapse(1_000_000);
            elapsed_ms += 1;
            assert!(elapsed_ms < 20_000, "move never finished");
        }

        assert_eq!(taken, 10_000);
        // 9500 cruise steps at 1 ms plus two 0.5 s ramps
        let expected = executor.profile().estimated_duration_secs() * 1000.0;
        assert!((elapsed_ms as f32 - expected).abs() < 100.0);
    }
}
