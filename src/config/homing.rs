//! Homing sequence configuration from TOML.

use serde::Deserialize;

use super::units::RevsPerSec;

/// Parameters of the three-phase homing run.
///
/// Seeks always travel toward negative positions, where the limit switch sits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    /// Cruise speed of the first (coarse) seek.
    #[serde(rename = "coarse_speed_rev_per_sec")]
    pub coarse_speed: RevsPerSec,

    /// S-curve ramp time into the coarse seek.
    pub coarse_ramp_ms: u32,

    /// Distance backed off the switch between the two seeks, in revolutions.
    pub retract_revolutions: f32,

    /// Cruise speed of the second (fine) seek.
    #[serde(rename = "fine_speed_rev_per_sec")]
    pub fine_speed: RevsPerSec,

    /// S-curve ramp time into the fine seek.
    pub fine_ramp_ms: u32,

    /// Settle time after every stop.
    pub dwell_ms: u32,

    /// Give up a seek after this long without a switch hit.
    ///
    /// `None` keeps seeking until an e-stop.
    pub seek_timeout_ms: Option<u32>,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            coarse_speed: RevsPerSec(5.0),
            coarse_ramp_ms: 2000,
            retract_revolutions: 2.0,
            fine_speed: RevsPerSec(1.0),
            fine_ramp_ms: 1000,
            dwell_ms: 500,
            seek_timeout_ms: None,
        }
    }
}
