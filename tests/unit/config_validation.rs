//! Unit tests for configuration validation.

use syringe_motion::config::{parse_config, validate_config, SystemConfig};
use syringe_motion::error::{ConfigError, Error};

/// Test validation of the factory defaults.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&SystemConfig::default()).is_ok());
}

/// Test validation fails for a motor with no steps.
#[test]
fn test_zero_steps_per_revolution() {
    let result = parse_config("[motor]\nsteps_per_revolution = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    ));
}

/// Test validation fails for a non-positive acceleration.
#[test]
fn test_invalid_acceleration() {
    let result = parse_config("[motor]\nacceleration_steps_per_sec2 = -10.0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Test validation fails when the jog speed exceeds the speed ceiling.
#[test]
fn test_jog_speed_above_ceiling() {
    // 8 rev/s * 3200 = 25600 steps/s > 20000
    let result = parse_config("[jog]\nspeed_rev_per_sec = 8.0\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidJogSpeed(_)))));
}

/// Test validation follows the ceiling when the motor table raises it.
#[test]
fn test_jog_speed_within_raised_ceiling() {
    let toml = r#"
[motor]
max_speed_steps_per_sec = 30000.0

[jog]
speed_rev_per_sec = 8.0
"#;
    assert!(parse_config(toml).is_ok());
}

/// Test validation fails for a zero fine homing speed.
#[test]
fn test_zero_fine_homing_speed() {
    let result = parse_config("[homing]\nfine_speed_rev_per_sec = 0.0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidHomingSpeed(_)))
    ));
}

/// Test validation fails for a zero retract distance.
#[test]
fn test_zero_retract_distance() {
    let result = parse_config("[homing]\nretract_revolutions = 0.0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidRetractDistance(_)))
    ));
}

/// Test validation fails for a zero telemetry interval.
#[test]
fn test_zero_telemetry_interval() {
    let result = parse_config("[telemetry]\ninterval_ms = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidTelemetryInterval(0)))
    ));
}

/// Test that validation errors render a readable message.
#[test]
fn test_error_display() {
    let err = parse_config("[telemetry]\ninterval_ms = 0\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Invalid telemetry interval: 0 ms. Must be > 0"
    );
}
