//! Homing: establishing the absolute zero of the plunger.
//!
//! The run seeks the limit switch fast, backs off, seeks it again slowly and
//! defines the second contact point as position 0.

mod sequencer;

pub use sequencer::{HomingPhase, HomingSequencer};
