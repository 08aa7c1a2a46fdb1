//! Emergency-stop latch.

mod monitor;

pub use monitor::SafetyMonitor;
