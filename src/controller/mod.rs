//! The pump controller and its cooperative scheduler.

mod interpreter;
mod main_loop;

pub use interpreter::Controller;
pub use main_loop::MainLoop;
