//! Unit test harness for syringe-motion.
//!
//! Groups the black-box tests for each public component of the library.

mod command_parsing;
mod config_parsing;
mod config_validation;
