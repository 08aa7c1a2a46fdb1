//! Hardware capabilities consumed by the controller.
//!
//! The controller never touches pins or driver registers directly; it drives
//! these traits, which firmware implements for the real board and tests
//! implement with the simulated backends.

mod actuator;
mod clock;
mod driver;
mod limit_switch;
mod position;
mod simulated;

pub use actuator::StepperActuator;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{Clock, ManualClock};
pub use driver::{EnablePinDriver, MotorDriverChip};
pub use limit_switch::{LimitSwitch, PinLimitSwitch};
pub use position::Position;
pub use simulated::{SimulatedDriver, SimulatedStepper, SimulatedSwitch};
