//! Homing limit switch.

use embedded_hal::digital::InputPin;

use crate::error::{MotorError, Result};

/// A binary end-of-travel switch.
pub trait LimitSwitch {
    /// Whether the switch is currently actuated.
    fn is_pressed(&mut self) -> Result<bool>;
}

/// Limit switch read from a GPIO input.
///
/// The usual wiring is a normally-open switch to ground with a pull-up, which
/// reads low when pressed.
pub struct PinLimitSwitch<P>
where
    P: InputPin,
{
    pin: P,
    active_low: bool,
}

impl<P> PinLimitSwitch<P>
where
    P: InputPin,
{
    /// Switch that reads low when pressed.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Switch that reads high when pressed.
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Release the input pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> LimitSwitch for PinLimitSwitch<P>
where
    P: InputPin,
{
    fn is_pressed(&mut self) -> Result<bool> {
        let high = self.pin.is_high().map_err(|_| MotorError::PinError)?;
        Ok(high != self.active_low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_active_low_switch() {
        let expectations = [
            Transaction::get(State::High),
            Transaction::get(State::Low),
        ];
        let pin = PinMock::new(&expectations);
        let mut handle = pin.clone();

        let mut switch = PinLimitSwitch::active_low(pin);
        assert!(!switch.is_pressed().unwrap());
        assert!(switch.is_pressed().unwrap());

        handle.done();
    }

    #[test]
    fn test_active_high_switch() {
        let expectations = [Transaction::get(State::High)];
        let pin = PinMock::new(&expectations);
        let mut handle = pin.clone();

        let mut switch = PinLimitSwitch::active_high(pin);
        assert!(switch.is_pressed().unwrap());

        handle.done();
    }
}
