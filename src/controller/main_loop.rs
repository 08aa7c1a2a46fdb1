//! Cooperative scheduler driving a [`Controller`] from a clock and a byte stream.

use core::fmt::Write;

use heapless::Deque;

use crate::error::Result;
use crate::motor::{Clock, LimitSwitch, MotorDriverChip, StepperActuator};
use crate::protocol::LineBuffer;

use super::interpreter::Controller;

/// Owns the controller, a clock and the receive path.
///
/// Firmware feeds received bytes with [`receive`](MainLoop::receive) (for
/// example from a UART interrupt drain) and calls
/// [`run_once`](MainLoop::run_once) from its idle loop. Each iteration
/// consumes bytes up to the end of at most one line.
pub struct MainLoop<C, D, A, L, const N: usize = 64>
where
    C: Clock,
    D: MotorDriverChip,
    A: StepperActuator,
    L: LimitSwitch,
{
    clock: C,
    controller: Controller<D, A, L>,
    rx: Deque<u8, N>,
    lines: LineBuffer<N>,
}

impl<C, D, A, L, const N: usize> MainLoop<C, D, A, L, N>
where
    C: Clock,
    D: MotorDriverChip,
    A: StepperActuator,
    L: LimitSwitch,
{
    /// Wrap a controller.
    pub fn new(clock: C, controller: Controller<D, A, L>) -> Self {
        Self {
            clock,
            controller,
            rx: Deque::new(),
            lines: LineBuffer::new(),
        }
    }

    /// Queue one received byte. Returns `false` (and drops the byte) when
    /// the queue is full.
    pub fn receive(&mut self, byte: u8) -> bool {
        if self.rx.push_back(byte).is_err() {
            warn!("receive queue full, byte dropped");
            return false;
        }
        true
    }

    /// Queue received bytes. Returns how many were accepted.
    pub fn receive_all(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().take_while(|&&byte| self.receive(byte)).count()
    }

    /// Run one scheduler iteration at the clock's current time.
    pub fn run_once<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let now_ms = self.clock.now_ms();

        let mut complete = false;
        while let Some(byte) = self.rx.pop_front() {
            if self.lines.push(byte) {
                complete = true;
                break;
            }
        }

        let line = if complete { self.lines.line() } else { None };
        self.controller.poll(now_ms, line, out)
    }

    /// The controller.
    #[inline]
    pub fn controller(&self) -> &Controller<D, A, L> {
        &self.controller
    }

    /// The controller, mutably.
    #[inline]
    pub fn controller_mut(&mut self) -> &mut Controller<D, A, L> {
        &mut self.controller
    }

    /// The clock.
    #[inline]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Release the clock and controller; queued input is discarded.
    pub fn into_parts(self) -> (C, Controller<D, A, L>) {
        (self.clock, self.controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::motor::{ManualClock, SimulatedDriver, SimulatedStepper, SimulatedSwitch};
    use heapless::String;

    type Loop = MainLoop<ManualClock, SimulatedDriver, SimulatedStepper, SimulatedSwitch, 32>;

    fn main_loop() -> Loop {
        let controller = Controller::new(
            &SystemConfig::default(),
            SimulatedDriver::new(),
            SimulatedStepper::new(0.0, 0.0),
            SimulatedSwitch::new(),
        )
        .unwrap();
        MainLoop::new(ManualClock::new(0), controller)
    }

    #[test]
    fn test_one_line_per_iteration() {
        let mut main_loop = main_loop();
        let mut out: String<256> = String::new();

        assert_eq!(main_loop.receive_all(b"SET_SPEED 400\r\nSTART\r\n"), 22);

        main_loop.run_once(&mut out).unwrap();
        assert_eq!(main_loop.controller().state().target_speed, 400.0);
        assert!(!main_loop.controller().driver().is_enabled());

        main_loop.run_once(&mut out).unwrap();
        assert!(main_loop.controller().driver().is_enabled());
        assert_eq!(main_loop.controller().actuator().speed(), 400.0);
    }

    #[test]
    fn test_partial_line_waits() {
        let mut main_loop = main_loop();
        let mut out: String<256> = String::new();

        main_loop.receive_all(b"EST");
        main_loop.run_once(&mut out).unwrap();
        assert!(!main_loop.controller().is_latched());

        main_loop.receive_all(b"OP\n");
        main_loop.run_once(&mut out).unwrap();
        assert!(main_loop.controller().is_latched());
    }

    #[test]
    fn test_full_queue_drops_bytes() {
        let mut main_loop = main_loop();
        let accepted = main_loop.receive_all(&[b'X'; 40]);
        assert_eq!(accepted, 32);
        assert!(!main_loop.receive(b'\n'));
    }

    #[test]
    fn test_runs_without_input() {
        let mut main_loop = main_loop();
        let mut out: String<256> = String::new();

        main_loop.receive_all(b"SET_SPEED 1000\n");
        main_loop.run_once(&mut out).unwrap();
        for _ in 0..1000 {
            main_loop.clock_mut().advance(1);
            main_loop.run_once(&mut out).unwrap();
        }

        assert_eq!(main_loop.controller().state().position_steps, 1000);
        assert_eq!(
            out.as_str(),
            "Current position in steps: 1000\r\nCurrent RPM: 0.31\r\n"
        );
    }
}
