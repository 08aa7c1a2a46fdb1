//! S-curve speed ramps.
//!
//! Speed transitions follow the smoothstep polynomial `f(p) = 3p² − 2p³`,
//! which is monotonic on `[0, 1]` with `f(0) = 0`, `f(1) = 1` and zero slope
//! at both ends, so the motor sees no step change in acceleration when a jog
//! starts or stops.

/// Smoothstep ease factor for a progress fraction.
///
/// `p` is clamped to `[0, 1]`; NaN is treated as 0.
#[inline]
pub fn smoothstep(p: f32) -> f32 {
    let p = if p > 0.0 { p.min(1.0) } else { 0.0 };
    p * p * (3.0 - 2.0 * p)
}

/// A speed transition between two signed step rates over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SCurveRamp {
    /// Speed at the start of the ramp, steps/s.
    pub from: f32,
    /// Speed at the end of the ramp, steps/s.
    pub to: f32,
    /// Ramp length in milliseconds.
    pub duration_ms: u32,
}

impl SCurveRamp {
    /// Create a ramp.
    pub const fn new(from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
        }
    }

    /// Progress fraction after `elapsed_ms`, clamped to `[0, 1]`.
    #[inline]
    pub fn progress(&self, elapsed_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }

    /// Eased speed after `elapsed_ms`.
    ///
    /// Returns exactly `to` once the duration has elapsed.
    pub fn speed_at(&self, elapsed_ms: u64) -> f32 {
        if self.is_finished(elapsed_ms) {
            return self.to;
        }
        self.from + (self.to - self.from) * smoothstep(self.progress(elapsed_ms))
    }

    /// Whether the ramp has run its full duration.
    #[inline]
    pub fn is_finished(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms as u64
    }
}
