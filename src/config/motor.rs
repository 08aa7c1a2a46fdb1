//! Motor and drive-train configuration from TOML.

use serde::Deserialize;

use super::units::{Microsteps, StepsPerSec, StepsPerSecSquared};

/// Stepper motor and driver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep setting programmed into the driver chip.
    pub microsteps: Microsteps,

    /// Run current handed to the driver chip at startup, in milliamps.
    pub run_current_ma: u16,

    /// Hardware speed ceiling; `SET_SPEED` can lower the working bound but never exceed this.
    #[serde(rename = "max_speed_steps_per_sec")]
    pub max_speed: StepsPerSec,

    /// Acceleration used by the actuator's own trapezoidal moves.
    #[serde(rename = "acceleration_steps_per_sec2")]
    pub acceleration: StepsPerSecSquared,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTEENTH,
            run_current_ma: 800,
            max_speed: StepsPerSec(20_000.0),
            acceleration: StepsPerSecSquared(10_000.0),
        }
    }
}

impl MotorConfig {
    /// Calculate total steps per shaft revolution.
    pub fn total_steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }
}
