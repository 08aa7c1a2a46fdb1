//! System configuration - root configuration structure.

use serde::Deserialize;

use super::homing::HomingConfig;
use super::motor::MotorConfig;
use super::units::RevsPerSec;

/// Root configuration structure from TOML.
///
/// Every table is optional; missing tables and keys take the factory defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Motor and driver settings.
    pub motor: MotorConfig,

    /// Manual jog settings.
    pub jog: JogConfig,

    /// Homing sequence settings.
    pub homing: HomingConfig,

    /// Periodic status output.
    pub telemetry: TelemetryConfig,

    /// Command line handling.
    pub protocol: ProtocolConfig,
}

/// Jog defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JogConfig {
    /// Jog speed used until the host sends `JOGSPEED`.
    #[serde(rename = "speed_rev_per_sec")]
    pub speed: RevsPerSec,

    /// S-curve ramp time for jog start and stop.
    pub ramp_ms: u32,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            speed: RevsPerSec(1.0),
            ramp_ms: 500,
        }
    }
}

/// Telemetry cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Minimum spacing between status reports.
    pub interval_ms: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// How strictly incoming command lines are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Unknown lines are ignored and bad numbers keep the previous value.
    #[default]
    Permissive,
    /// Unknown lines and bad numbers are rejected with an `ERR` line.
    Strict,
}

/// Command protocol settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Parser strictness.
    pub parse_mode: ParseMode,
}
