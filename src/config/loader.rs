//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
///
/// # Example
///
/// ```rust,ignore
/// use syringe_motion::load_config;
///
/// let config = load_config("pump.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseMode;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.motor.total_steps_per_revolution(), 3200);
        assert_eq!(config.jog.ramp_ms, 500);
        assert_eq!(config.telemetry.interval_ms, 1000);
        assert_eq!(config.protocol.parse_mode, ParseMode::Permissive);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[motor]
steps_per_revolution = 200
microsteps = 8
run_current_ma = 600
max_speed_steps_per_sec = 12000.0
acceleration_steps_per_sec2 = 4000.0

[jog]
speed_rev_per_sec = 2.0
ramp_ms = 250

[homing]
coarse_speed_rev_per_sec = 4.0
fine_speed_rev_per_sec = 0.5
seek_timeout_ms = 30000

[protocol]
parse_mode = "strict"
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.motor.total_steps_per_revolution(), 1600);
        assert_eq!(config.motor.run_current_ma, 600);
        assert_eq!(config.jog.speed.value(), 2.0);
        assert_eq!(config.homing.seek_timeout_ms, Some(30000));
        // Unset keys inside a present table keep their defaults
        assert_eq!(config.homing.dwell_ms, 500);
        assert_eq!(config.protocol.parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_parse_rejects_bad_microsteps() {
        let result = parse_config("[motor]\nmicrosteps = 3\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
