//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Motor geometry and speed ceiling are positive
/// - Jog and homing speeds are reachable under the speed ceiling
/// - Homing retract distance is positive
/// - Telemetry interval is non-zero
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_motor(&config.motor)?;

    let steps_per_rev = config.motor.total_steps_per_revolution() as f32;
    let ceiling = config.motor.max_speed.value();

    let jog = config.jog.speed.value();
    if !(jog >= 0.0) || jog * steps_per_rev > ceiling {
        return Err(Error::Config(ConfigError::InvalidJogSpeed(jog)));
    }

    validate_homing(&config.homing, steps_per_rev, ceiling)?;

    if config.telemetry.interval_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidTelemetryInterval(0)));
    }

    Ok(())
}

fn validate_motor(config: &super::MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)));
    }

    // Written negated so NaN fails too
    if !(config.max_speed.value() > 0.0) {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(
            config.max_speed.value(),
        )));
    }

    if !(config.acceleration.value() > 0.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.value(),
        )));
    }

    Ok(())
}

fn validate_homing(config: &super::HomingConfig, steps_per_rev: f32, ceiling: f32) -> Result<()> {
    for speed in [config.coarse_speed.value(), config.fine_speed.value()] {
        if !(speed > 0.0) || speed * steps_per_rev > ceiling {
            return Err(Error::Config(ConfigError::InvalidHomingSpeed(speed)));
        }
    }

    if !(config.retract_revolutions > 0.0) {
        return Err(Error::Config(ConfigError::InvalidRetractDistance(
            config.retract_revolutions,
        )));
    }

    Ok(())
}
