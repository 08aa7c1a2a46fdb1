//! Unit tests for TOML configuration parsing.

use syringe_motion::config::{load_config, parse_config, ParseMode, SystemConfig};
use syringe_motion::config::units::{Microsteps, RevsPerSec};
use syringe_motion::error::{ConfigError, Error};

/// Test parsing a complete pump configuration.
#[test]
fn test_parse_pump_config() {
    let toml_str = r#"
[motor]
steps_per_revolution = 400
microsteps = 32
run_current_ma = 1200
max_speed_steps_per_sec = 40000.0
acceleration_steps_per_sec2 = 15000.0

[jog]
speed_rev_per_sec = 0.5
ramp_ms = 300

[homing]
coarse_speed_rev_per_sec = 2.0
coarse_ramp_ms = 1500
retract_revolutions = 1.5
fine_speed_rev_per_sec = 0.25
fine_ramp_ms = 800
dwell_ms = 250

[telemetry]
interval_ms = 500
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.motor.steps_per_revolution, 400);
    assert_eq!(config.motor.microsteps, Microsteps::THIRTY_SECOND);
    assert_eq!(config.motor.total_steps_per_revolution(), 12800);
    assert_eq!(config.motor.run_current_ma, 1200);
    assert_eq!(config.motor.max_speed.value(), 40000.0);
    assert_eq!(config.motor.acceleration.value(), 15000.0);
    assert_eq!(config.jog.speed, RevsPerSec(0.5));
    assert_eq!(config.jog.ramp_ms, 300);
    assert_eq!(config.homing.coarse_speed, RevsPerSec(2.0));
    assert_eq!(config.homing.coarse_ramp_ms, 1500);
    assert_eq!(config.homing.retract_revolutions, 1.5);
    assert_eq!(config.homing.fine_speed, RevsPerSec(0.25));
    assert_eq!(config.homing.fine_ramp_ms, 800);
    assert_eq!(config.homing.dwell_ms, 250);
    assert_eq!(config.homing.seek_timeout_ms, None);
    assert_eq!(config.telemetry.interval_ms, 500);
    assert_eq!(config.protocol.parse_mode, ParseMode::Permissive);
}

/// Test that missing tables fall back to the factory defaults.
#[test]
fn test_missing_tables_use_defaults() {
    let config: SystemConfig = toml::from_str("[jog]\nramp_ms = 100\n").expect("Failed to parse TOML");

    assert_eq!(config.jog.ramp_ms, 100);
    assert_eq!(config.jog.speed, RevsPerSec(1.0));
    assert_eq!(config.motor.total_steps_per_revolution(), 3200);
    assert_eq!(config.homing.coarse_speed, RevsPerSec(5.0));
    assert_eq!(config.homing.retract_revolutions, 2.0);
}

/// Test all supported microstep settings.
#[test]
fn test_microstep_values() {
    for value in [1u16, 2, 4, 8, 16, 32, 64, 128, 256] {
        let toml = format!("[motor]\nmicrosteps = {value}\n");
        let config: SystemConfig = toml::from_str(&toml).unwrap_or_else(|e| panic!("{value}: {e}"));
        assert_eq!(config.motor.microsteps.value(), value);
        assert_eq!(config.motor.total_steps_per_revolution(), 200 * value as u32);
    }
}

/// Test that unsupported microstep settings are rejected.
#[test]
fn test_invalid_microsteps() {
    let result = parse_config("[motor]\nmicrosteps = 12\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test that unknown parse modes are rejected.
#[test]
fn test_unknown_parse_mode() {
    let result = parse_config("[protocol]\nparse_mode = \"lenient\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("syringe-motion-{}.toml", std::process::id()));
    std::fs::write(&path, "[protocol]\nparse_mode = \"strict\"\n").expect("Failed to write config");

    let config = load_config(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(config.expect("Failed to load").protocol.parse_mode, ParseMode::Strict);
}

/// Test that a missing file is reported as an I/O error.
#[test]
fn test_load_config_missing_file() {
    let result = load_config("/nonexistent/syringe-motion/pump.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
