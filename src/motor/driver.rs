//! Stepper driver chip capability.
//!
//! The controller only ever switches the power stage and sets the run current;
//! everything else about the chip (microstepping, chopper mode) is configured by
//! the firmware before the controller is built.

use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};

/// Power-stage control of a stepper driver chip.
pub trait MotorDriverChip {
    /// Energize the motor coils.
    fn enable(&mut self) -> Result<()>;

    /// De-energize the motor coils; the shaft is free to turn.
    fn disable(&mut self) -> Result<()>;

    /// Set the RMS run current in milliamps.
    fn set_run_current(&mut self, milliamps: u16) -> Result<()>;

    /// Whether the power stage is currently energized.
    fn is_enabled(&self) -> bool;
}

/// Driver chip controlled through a single EN pin.
///
/// Most step/dir drivers (A4988, DRV8825, TMC2209 in standalone mode) expose an
/// active-low enable input. Current is set by a trimmer on those boards, so the
/// requested value is only recorded.
pub struct EnablePinDriver<EN>
where
    EN: OutputPin,
{
    /// EN pin.
    enable_pin: EN,

    /// Pin level that energizes the driver is low.
    active_low: bool,

    /// Last state written to the pin.
    enabled: bool,

    /// Last requested run current.
    run_current_ma: u16,
}

impl<EN> EnablePinDriver<EN>
where
    EN: OutputPin,
{
    /// Wrap an active-low EN pin. The pin is not touched until the first call.
    pub fn new(enable_pin: EN) -> Self {
        Self::with_polarity(enable_pin, true)
    }

    /// Wrap an EN pin with explicit polarity.
    pub fn with_polarity(enable_pin: EN, active_low: bool) -> Self {
        Self {
            enable_pin,
            active_low,
            enabled: false,
            run_current_ma: 0,
        }
    }

    /// Last requested run current in milliamps.
    #[inline]
    pub fn run_current_ma(&self) -> u16 {
        self.run_current_ma
    }

    /// Release the EN pin.
    pub fn into_inner(self) -> EN {
        self.enable_pin
    }

    fn write(&mut self, energize: bool) -> Result<()> {
        let pin_high = energize != self.active_low;

        if pin_high {
            self.enable_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.enable_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.enabled = energize;
        Ok(())
    }
}

impl<EN> MotorDriverChip for EnablePinDriver<EN>
where
    EN: OutputPin,
{
    fn enable(&mut self) -> Result<()> {
        self.write(true)
    }

    fn disable(&mut self) -> Result<()> {
        self.write(false)
    }

    fn set_run_current(&mut self, milliamps: u16) -> Result<()> {
        self.run_current_ma = milliamps;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_active_low_enable() {
        let expectations = [Transaction::set(State::Low), Transaction::set(State::High)];
        let pin = PinMock::new(&expectations);
        let mut handle = pin.clone();

        let mut driver = EnablePinDriver::new(pin);
        assert!(!driver.is_enabled());

        driver.enable().unwrap();
        assert!(driver.is_enabled());

        driver.disable().unwrap();
        assert!(!driver.is_enabled());

        handle.done();
    }

    #[test]
    fn test_active_high_enable() {
        let expectations = [Transaction::set(State::High)];
        let pin = PinMock::new(&expectations);
        let mut handle = pin.clone();

        let mut driver = EnablePinDriver::with_polarity(pin, false);
        driver.enable().unwrap();
        driver.set_run_current(650).unwrap();
        assert_eq!(driver.run_current_ma(), 650);

        handle.done();
    }
}
