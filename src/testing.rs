//! Recording doubles shared by the unit tests

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::{delay::DelayNs, digital, spi};

use crate::engine::Phase;
use crate::interface::{ResetTiming, Target};
use crate::traits::{Command, ControllerBus};

/// One step seen by a [`RecordingBus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Frame(Target, u8, Vec<u8>),
    Delay(u32),
    Reset(ResetTiming),
    Wait(Phase),
    Lines,
}

/// Bus that records what a sequence asks for
#[derive(Default)]
pub(crate) struct RecordingBus {
    pub steps: Vec<Step>,
}

impl RecordingBus {
    /// Only the `(target, index)` of every frame
    pub fn frames(&self) -> Vec<(Target, u8)> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                Step::Frame(t, i, _) => Some((*t, *i)),
                _ => None,
            })
            .collect()
    }

    /// Data of every frame sent with `index`
    pub fn data_of(&self, index: u8) -> Vec<&[u8]> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                Step::Frame(_, i, d) if *i == index => Some(d.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl ControllerBus for RecordingBus {
    type Error = Infallible;

    fn send<T: Command>(&mut self, target: Target, command: T, data: &[u8]) -> Result<(), Infallible> {
        self.steps
            .push(Step::Frame(target, command.address(), data.to_vec()));
        Ok(())
    }

    fn reset(&mut self, timing: &ResetTiming) -> Result<(), Infallible> {
        self.steps.push(Step::Reset(*timing));
        Ok(())
    }

    fn wait_until_idle(&mut self, phase: Phase) -> Result<(), Infallible> {
        self.steps.push(Step::Wait(phase));
        Ok(())
    }

    fn power_down_lines(&mut self) -> Result<(), Infallible> {
        self.steps.push(Step::Lines);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.steps.push(Step::Delay(ms));
    }
}

/// Hardware level event, in the order it happened on the wires
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Wire {
    Pin(&'static str, bool),
    Spi(Vec<u8>),
    BusyRead,
    DelayNs(u32),
}

pub(crate) type WireLog = Rc<RefCell<Vec<Wire>>>;

pub(crate) struct LogSpi(pub WireLog);

impl spi::ErrorType for LogSpi {
    type Error = Infallible;
}

impl spi::SpiBus<u8> for LogSpi {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        let mut log = self.0.borrow_mut();
        // chunked writes of one frame land in one entry
        if let Some(Wire::Spi(last)) = log.last_mut() {
            last.extend_from_slice(words);
        } else {
            log.push(Wire::Spi(words.to_vec()));
        }
        Ok(())
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Infallible> {
        Ok(())
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

pub(crate) struct LogPin(pub &'static str, pub WireLog);

impl digital::ErrorType for LogPin {
    type Error = Infallible;
}

impl digital::OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.1.borrow_mut().push(Wire::Pin(self.0, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.1.borrow_mut().push(Wire::Pin(self.0, true));
        Ok(())
    }
}

/// Busy line that is ready on every read
pub(crate) struct ReadyBusy(pub WireLog);

impl digital::ErrorType for ReadyBusy {
    type Error = Infallible;
}

impl digital::InputPin for ReadyBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.0.borrow_mut().push(Wire::BusyRead);
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

pub(crate) struct LogDelay(pub WireLog);

impl DelayNs for LogDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Wire::DelayNs(ns));
    }
}
