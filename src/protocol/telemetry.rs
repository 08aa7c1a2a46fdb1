//! Periodic status lines.

use core::fmt::Write;

use crate::config::units::RevsPerSec;
use crate::error::Result;

/// Emits position and speed to the host at a fixed interval.
///
/// The interval is measured from the previous report rather than from a
/// fixed schedule, so a slow iteration delays every later report.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    interval_ms: u32,
    last_report_ms: u64,
}

impl StatusReporter {
    /// Reporter whose first line is due `interval_ms` after time 0.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_report_ms: 0,
        }
    }

    /// Configured interval.
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Whether a report is due at `now_ms`.
    #[inline]
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_report_ms) >= self.interval_ms as u64
    }

    /// Write a report if one is due. Returns whether one was written.
    ///
    /// `rate` is printed under the historical `Current RPM` label.
    pub fn poll<W: Write>(
        &mut self,
        now_ms: u64,
        position_steps: i64,
        rate: RevsPerSec,
        out: &mut W,
    ) -> Result<bool> {
        if !self.is_due(now_ms) {
            return Ok(false);
        }
        self.last_report_ms = now_ms;

        write!(out, "Current position in steps: {}\r\n", position_steps)?;
        write!(out, "Current RPM: {:.2}\r\n", rate.value())?;
        trace!("telemetry at {} ms", now_ms);
        Ok(true)
    }
}
