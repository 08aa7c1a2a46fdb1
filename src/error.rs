//! Error types for syringe-motion.
//!
//! Provides unified error handling across configuration, hardware capabilities,
//! and the command protocol.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all syringe-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Driver chip, pin or actuator error
    Motor(MotorError),
    /// Command rejected by the interpreter
    Command(CommandError),
    /// Writing to the host link failed
    Output,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Base steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Invalid jog speed (must be >= 0 and reachable under max speed)
    InvalidJogSpeed(f32),
    /// Homing seek speed must be > 0 and reachable under max speed
    InvalidHomingSpeed(f32),
    /// Homing retract distance must be > 0
    InvalidRetractDistance(f32),
    /// Telemetry interval must be > 0
    InvalidTelemetryInterval(u32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware capability errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Driver chip rejected a request (e.g. run current out of range)
    DriverFault,
}

/// Reasons a command line is rejected.
///
/// In permissive mode these are swallowed; in strict mode they are reported
/// to the host as `ERR <reason>` lines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The line does not start with a known verb
    UnknownCommand(heapless::String<64>),
    /// The numeric argument is missing or malformed
    InvalidArgument {
        /// Verb whose argument failed to parse
        command: &'static str,
    },
    /// The safety latch is set; motion commands are refused
    SafetyLatched,
    /// A homing run is in progress
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
            Error::Output => write!(f, "Failed to write to host link"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => write!(f, "Invalid acceleration: {}. Must be > 0", v),
            ConfigError::InvalidJogSpeed(v) => {
                write!(f, "Invalid jog speed: {} rev/s. Must be >= 0 and within max speed", v)
            }
            ConfigError::InvalidHomingSpeed(v) => {
                write!(f, "Invalid homing speed: {} rev/s. Must be > 0 and within max speed", v)
            }
            ConfigError::InvalidRetractDistance(v) => {
                write!(f, "Invalid homing retract: {} rev. Must be > 0", v)
            }
            ConfigError::InvalidTelemetryInterval(v) => {
                write!(f, "Invalid telemetry interval: {} ms. Must be > 0", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::DriverFault => write!(f, "Driver chip rejected request"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(line) => write!(f, "unknown command '{}'", line),
            CommandError::InvalidArgument { command } => {
                write!(f, "invalid argument for {}", command)
            }
            CommandError::SafetyLatched => write!(f, "safety latch set"),
            CommandError::Busy => write!(f, "homing in progress"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Output
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}
