//! Refresh sequence of the COG driven panels, 5.65" and larger
//!
//! The host drives the booster itself: after the frames are loaded it
//! initialises the COG, writes the temperature, and ramps the DC-DC converter
//! up in small steps before the refresh is triggered. The 9.69" and 11.98"
//! panels carry a master and a slave controller, each receiving its half of
//! both planes.

pub(crate) mod command;
mod model;

use self::command::Command;
use self::model::ModelParams;
use crate::engine::Phase;
use crate::interface::{ResetTiming, Target};
use crate::profile::{Profile, SizeClass, TYPE_FILM_K};
use crate::temperature::Temperature;
use crate::traits::{ControllerBus, Frames, PanelSequence};

/// DCTL value selecting the film of the 0x0B panels
const DCTL_FILM_K: u8 = 0x08;
const TCON: u8 = 0x25;
const REFRESH: u8 = 0x3C;

/// Converter settings bracketing one soft-start step
const DCDC_LOW_OFF: u8 = 0x1F;
const DCDC_LOW_ON: u8 = 0x9F;
const DCDC_HIGH_OFF: u8 = 0x7F;
const DCDC_HIGH_ON: u8 = 0xFF;

pub(crate) struct CogSequence {
    params: ModelParams,
    dual: bool,
    film_k: bool,
}

impl CogSequence {
    /// Sequence for a medium or large panel, `None` for any other
    pub fn new(profile: &Profile) -> Option<CogSequence> {
        if profile.size_class == SizeClass::Small {
            return None;
        }
        let params = ModelParams::lookup(profile.size_code())?;
        Some(CogSequence {
            params,
            dual: profile.is_dual_controller,
            film_k: profile.id.film() == TYPE_FILM_K,
        })
    }

    /// Controllers that receive their own copy of the per controller steps
    fn controllers(&self) -> &'static [Target] {
        if self.dual {
            &[Target::Master, Target::Slave]
        } else {
            &[Target::Both]
        }
    }

    /// Write one register through the apply pulse
    fn apply<B: ControllerBus>(
        &self,
        bus: &mut B,
        target: Target,
        command: Command,
        value: u8,
    ) -> Result<(), B::Error> {
        bus.send(target, command, &[value])?;
        bus.send(target, Command::ApplyRegister, &[0x10])?;
        bus.delay_ms(100);
        bus.send(target, Command::ApplyRegister, &[0x00])?;
        bus.delay_ms(100);
        Ok(())
    }

    fn write_temperature<B: ControllerBus>(
        &self,
        bus: &mut B,
        target: Target,
        temperature: &Temperature,
    ) -> Result<(), B::Error> {
        bus.send(target, Command::TemperatureSelect, &[0x00])?;
        self.apply(bus, target, Command::TemperatureWrite, 0x80)?;
        bus.send(target, Command::TemperatureSelect, &[0x06])?;
        self.apply(bus, target, Command::TemperatureWrite, temperature.cog_code())
    }

    fn soft_start<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.send(Target::Both, Command::SoftStart, &[0x50, 0x01])?;
        for v in 1..=4 {
            ramp_step(bus, [0x50, v], DCDC_LOW_OFF, DCDC_LOW_ON)?;
        }
        for v in 1..=10 {
            ramp_step(bus, [0x0A, v], DCDC_LOW_OFF, DCDC_LOW_ON)?;
        }
        for v in 3..=10 {
            ramp_step(bus, [0x0A, v], DCDC_HIGH_OFF, DCDC_HIGH_ON)?;
        }
        for v in (2..=9).rev() {
            ramp_step(bus, [v, 0x0A], DCDC_HIGH_OFF, DCDC_HIGH_ON)?;
        }
        bus.send(Target::Both, Command::DcDc, &[DCDC_HIGH_ON])?;
        bus.delay_ms(10);
        Ok(())
    }
}

fn ramp_step<B: ControllerBus>(
    bus: &mut B,
    soft_start: [u8; 2],
    before: u8,
    after: u8,
) -> Result<(), B::Error> {
    bus.send(Target::Both, Command::DcDc, &[before])?;
    bus.send(Target::Both, Command::SoftStart, &soft_start)?;
    bus.send(Target::Both, Command::DcDc, &[after])?;
    bus.delay_ms(2);
    Ok(())
}

impl PanelSequence for CogSequence {
    fn reset_timing(&self) -> ResetTiming {
        if self.dual {
            ResetTiming([200, 20, 200, 200, 5])
        } else {
            ResetTiming([200, 20, 200, 50, 5])
        }
    }

    fn load_frames<B: ControllerBus>(
        &self,
        bus: &mut B,
        frames: Frames<'_>,
        _temperature: &Temperature,
    ) -> Result<(), B::Error> {
        let p = &self.params;
        bus.send(Target::Both, Command::Duw, &p.duw)?;
        bus.send(Target::Both, Command::Drfw, &p.drfw)?;

        if self.dual {
            if self.film_k {
                bus.send(Target::Both, Command::Dctl, &[DCTL_FILM_K])?;
            }
            let fs = frames.frame_size;
            for (target, half) in [(Target::Master, 0..fs), (Target::Slave, fs..2 * fs)] {
                bus.send(target, Command::RamRw, &p.ram_rw)?;
                bus.send(target, Command::FirstFrame, &frames.black[half.clone()])?;
                bus.send(target, Command::RamRw, &p.ram_rw)?;
                bus.send(target, Command::SecondFrame, &frames.red[half])?;
            }
        } else {
            bus.send(Target::Both, Command::RamRw, &p.ram_rw)?;
            if self.film_k {
                bus.send(Target::Both, Command::Dctl, &[DCTL_FILM_K])?;
            }
            bus.send(
                Target::Both,
                Command::FirstFrame,
                &frames.black[..frames.frame_size],
            )?;
            bus.send(Target::Both, Command::RamRw, &p.ram_rw)?;
            bus.send(
                Target::Both,
                Command::SecondFrame,
                &frames.red[..frames.frame_size],
            )?;
        }
        Ok(())
    }

    fn power_sequence<B: ControllerBus>(
        &self,
        bus: &mut B,
        temperature: &Temperature,
    ) -> Result<(), B::Error> {
        let p = &self.params;

        bus.send(Target::Both, Command::PowerControl, &[0x7D])?;
        bus.delay_ms(200);
        bus.send(Target::Both, Command::PowerControl, &[0x00])?;
        bus.delay_ms(10);
        bus.send(Target::Both, Command::Booster, &[0x3F])?;
        bus.delay_ms(1);
        bus.send(Target::Both, Command::MasterSlaveSync, &[p.ms_sync])?;
        bus.send(Target::Both, Command::Bvss, &[0x00])?;
        bus.send(Target::Both, Command::ApplyRegister, &[0x10])?;
        bus.delay_ms(100);
        bus.send(Target::Both, Command::ApplyRegister, &[0x00])?;
        bus.delay_ms(100);
        bus.send(Target::Both, Command::Oscillator, &p.oscillator)?;

        for &target in self.controllers() {
            self.write_temperature(bus, target, temperature)?;
        }

        bus.send(Target::Both, Command::Tcon, &[TCON])?;
        // only the master scans on dual controller panels
        let stv = if self.dual { Target::Master } else { Target::Both };
        bus.send(stv, Command::StvDirection, &[p.stv_direction])?;
        bus.send(Target::Both, Command::Dctl, &[0x00])?;
        bus.send(Target::Both, Command::Vcom, &[0x00])?;

        self.soft_start(bus)
    }

    fn refresh_pulse<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.wait_until_idle(Phase::RefreshPulse)?;
        bus.send(Target::Both, Command::DisplayRefresh, &[REFRESH])?;
        bus.delay_ms(5);
        Ok(())
    }

    fn power_down<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.wait_until_idle(Phase::PowerDown)?;
        bus.send(Target::Both, Command::DcDc, &[DCDC_HIGH_OFF])?;
        bus.send(Target::Both, Command::PowerControl, &[0x7D])?;
        bus.send(Target::Both, Command::DcDc, &[0x00])?;
        bus.delay_ms(200);
        bus.wait_until_idle(Phase::PowerDown)?;
        bus.power_down_lines()
    }
}
