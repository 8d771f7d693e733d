//! Refresh sequence of the small panels, 1.54" to 4.37"
//!
//! One controller, fed with combined frames. The controller keeps its
//! waveforms in OTP, so the host only hands over the temperature and the two
//! image planes.

pub(crate) mod command;

use self::command::Command;
use crate::engine::Phase;
use crate::interface::{ResetTiming, Target};
use crate::temperature::Temperature;
use crate::traits::{ControllerBus, Frames, PanelSequence};

/// Soft reset argument
const SOFT_RESET: u8 = 0x0E;
/// Use the temperature written with `InputTemperature`
const ACTIVE_TEMPERATURE: u8 = 0x02;

pub(crate) struct SmallSequence;

impl PanelSequence for SmallSequence {
    fn reset_timing(&self) -> ResetTiming {
        ResetTiming([5, 5, 10, 5, 5])
    }

    fn load_frames<B: ControllerBus>(
        &self,
        bus: &mut B,
        frames: Frames<'_>,
        temperature: &Temperature,
    ) -> Result<(), B::Error> {
        bus.send(Target::Both, Command::SoftReset, &[SOFT_RESET])?;
        bus.delay_ms(5);

        // plain two's complement celsius, 25 °C = 0x19
        bus.send(
            Target::Both,
            Command::InputTemperature,
            &[temperature.celsius() as u8],
        )?;
        bus.send(Target::Both, Command::ActiveTemperature, &[ACTIVE_TEMPERATURE])?;

        bus.send(
            Target::Both,
            Command::DataStartTransmission1,
            &frames.black[..frames.frame_size],
        )?;
        bus.send(
            Target::Both,
            Command::DataStartTransmission2,
            &frames.red[..frames.frame_size],
        )
    }

    fn power_sequence<B: ControllerBus>(
        &self,
        bus: &mut B,
        _temperature: &Temperature,
    ) -> Result<(), B::Error> {
        bus.delay_ms(50);
        bus.send(Target::Both, Command::PowerOn, &[0x00])?;
        bus.delay_ms(5);
        bus.wait_until_idle(Phase::PowerSequence)
    }

    fn refresh_pulse<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.send(Target::Both, Command::DisplayRefresh, &[0x00])?;
        bus.delay_ms(5);
        bus.wait_until_idle(Phase::RefreshPulse)
    }

    fn power_down<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.send(Target::Both, Command::PowerOff, &[0x00])?;
        bus.delay_ms(5);
        bus.wait_until_idle(Phase::PowerDown)?;
        bus.power_down_lines()
    }
}
