//! Motion module for syringe-motion.
//!
//! Provides the shared motion state, S-curve speed ramps for jogging and
//! homing seeks, and the trapezoidal profile used for positioning moves.

mod executor;
mod profile;
mod ramp;
mod scurve;
mod state;

pub use executor::StepExecutor;
pub use profile::{Direction, MotionPhase, TrapezoidalProfile};
pub use ramp::{RampExecutor, TickStatus};
pub use scurve::{smoothstep, SCurveRamp};
pub use state::{MotionContext, MotionState};
