//! Configuration module for syringe-motion.
//!
//! Provides types for loading and validating pump configuration from TOML files
//! (with `std` feature) or building it in code from the defaults.

mod homing;
mod mechanical;
mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use homing::HomingConfig;
pub use mechanical::{HomingPlan, MechanicalConstraints};
pub use motor::MotorConfig;
pub use system::{JogConfig, ParseMode, ProtocolConfig, SystemConfig, TelemetryConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Microsteps, RevsPerSec, Steps, StepsPerSec, StepsPerSecSquared};
