//! Monotonic millisecond clock.

/// Source of monotonic time for the scheduler.
///
/// Only differences between readings matter; the epoch is arbitrary.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point.
    fn now_ms(&mut self) -> u64;
}

/// Wall clock backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for simulation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    /// Clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    /// Move time forward.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> u64 {
        self.now_ms
    }
}
