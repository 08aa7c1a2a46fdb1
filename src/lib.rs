//! # syringe-motion
//!
//! Motion control for a lead-screw syringe pump driven by one stepper motor,
//! with embedded-hal 1.0 adapters.
//!
//! ## Features
//!
//! - **Line protocol**: `SET_SPEED`, `START`, `STOP`, jogging, homing and
//!   e-stop commands over any byte stream
//! - **S-curve ramps**: jog starts and stops follow a smoothstep profile
//! - **Homing**: coarse seek, back-off and fine seek against a limit switch
//! - **Safety latch**: a sticky e-stop that gates every motion command
//! - **Non-blocking**: every long operation is a state machine ticked from a
//!   single cooperative loop, so commands are accepted while motors move
//! - **no_std compatible**: the core library works without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use syringe_motion::{Controller, EnablePinDriver, MainLoop, PinLimitSwitch, SystemConfig};
//!
//! let config: SystemConfig = syringe_motion::load_config("pump.toml")?;
//!
//! let controller = Controller::new(
//!     &config,
//!     EnablePinDriver::new(en_pin),
//!     stepper,
//!     PinLimitSwitch::active_low(home_pin),
//! )?;
//! let mut pump: MainLoop<_, _, _, _> = MainLoop::new(clock, controller);
//!
//! loop {
//!     while let Some(byte) = uart.read() {
//!         pump.receive(byte);
//!     }
//!     pump.run_once(&mut uart)?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML file loading, a wall clock and `std::error::Error`
//! - `defmt`: defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible in every module
#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod error;
pub mod homing;
pub mod motion;
pub mod motor;
pub mod protocol;
pub mod safety;

// Re-exports for ergonomic API
pub use config::{validate_config, HomingConfig, MotorConfig, ParseMode, SystemConfig};
pub use controller::{Controller, MainLoop};
pub use error::{CommandError, ConfigError, Error, MotorError, Result};
pub use homing::{HomingPhase, HomingSequencer};
pub use motion::{MotionState, RampExecutor, SCurveRamp, TickStatus};
pub use motor::{
    Clock, EnablePinDriver, LimitSwitch, ManualClock, MotorDriverChip, PinLimitSwitch,
    SimulatedDriver, SimulatedStepper, SimulatedSwitch, StepperActuator,
};
pub use protocol::{parse_command, Command, LineBuffer, StatusReporter};
pub use safety::SafetyMonitor;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use motor::StdClock;

// Unit types
pub use config::units::{Microsteps, RevsPerSec, Steps, StepsPerSec};
