//! Host command protocol.
//!
//! Newline-terminated ASCII lines in, periodic telemetry lines out.

mod command;
mod line;
mod telemetry;

pub use command::{first_float, parse_command, Command};
pub use line::LineBuffer;
pub use telemetry::StatusReporter;
