//! Refresh protocol state machine
//!
//! One run per flush: `Idle → Reset → LoadFrames → PowerSequence →
//! RefreshPulse → PowerDown → Idle`. When the temperature policy refuses the
//! update the run ends in [`Phase::Suppressed`] without touching the bus.

use crate::cog::CogSequence;
use crate::interface::ResetTiming;
use crate::profile::{Profile, SizeClass};
use crate::small::SmallSequence;
use crate::temperature::{Temperature, TemperatureClass, UpdateMode};
use crate::traits::{ControllerBus, Frames, PanelSequence};

/// Phase of a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No refresh running, or the last one completed
    #[default]
    Idle,
    /// Hardware reset pulse on the reset line
    Reset,
    /// Soft reset and transfer of both colour planes
    LoadFrames,
    /// Booster and converter start up
    PowerSequence,
    /// Refresh command and its busy wait
    RefreshPulse,
    /// Converter off and release of the panel lines
    PowerDown,
    /// The temperature policy refused the last update
    Suppressed,
}

/// Sequence selected by the size class of the panel
enum Sequence {
    Small(SmallSequence),
    Cog(CogSequence),
}

impl Sequence {
    fn reset_timing(&self) -> ResetTiming {
        match self {
            Sequence::Small(s) => s.reset_timing(),
            Sequence::Cog(s) => s.reset_timing(),
        }
    }

    fn load_frames<B: ControllerBus>(
        &self,
        bus: &mut B,
        frames: Frames<'_>,
        temperature: &Temperature,
    ) -> Result<(), B::Error> {
        match self {
            Sequence::Small(s) => s.load_frames(bus, frames, temperature),
            Sequence::Cog(s) => s.load_frames(bus, frames, temperature),
        }
    }

    fn power_sequence<B: ControllerBus>(
        &self,
        bus: &mut B,
        temperature: &Temperature,
    ) -> Result<(), B::Error> {
        match self {
            Sequence::Small(s) => s.power_sequence(bus, temperature),
            Sequence::Cog(s) => s.power_sequence(bus, temperature),
        }
    }

    fn refresh_pulse<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        match self {
            Sequence::Small(s) => s.refresh_pulse(bus),
            Sequence::Cog(s) => s.refresh_pulse(bus),
        }
    }

    fn power_down<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        match self {
            Sequence::Small(s) => s.power_down(bus),
            Sequence::Cog(s) => s.power_down(bus),
        }
    }
}

pub(crate) struct Engine {
    sequence: Sequence,
    phase: Phase,
}

impl Engine {
    /// Engine for `profile`, `None` when no sequence drives its size code
    pub fn new(profile: &Profile) -> Option<Engine> {
        if !profile.is_valid() {
            return None;
        }
        let sequence = match profile.size_class {
            SizeClass::Small => Sequence::Small(SmallSequence),
            SizeClass::Medium | SizeClass::Large => Sequence::Cog(CogSequence::new(profile)?),
        };
        Some(Engine {
            sequence,
            phase: Phase::Idle,
        })
    }

    /// Phase reached by the last run
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("refresh {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Size class reset, also used on its own at initialisation
    pub fn reset<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.reset(&self.sequence.reset_timing())
    }

    /// Run one refresh and return the update actually performed.
    ///
    /// On error the engine stays in the failing phase; the next run starts over.
    pub fn run<B: ControllerBus>(
        &mut self,
        bus: &mut B,
        frames: Frames<'_>,
        temperature: &Temperature,
        requested: UpdateMode,
        features: u8,
    ) -> Result<UpdateMode, B::Error> {
        self.phase = Phase::Idle;

        let mode = temperature.decide(requested, features);
        if mode == UpdateMode::None {
            log::warn!(
                "update suppressed at {} C ({:?})",
                temperature.celsius(),
                TemperatureClass::from_features(features)
            );
            self.enter(Phase::Suppressed);
            return Ok(mode);
        }

        self.enter(Phase::Reset);
        self.reset(bus)?;
        self.enter(Phase::LoadFrames);
        self.sequence.load_frames(bus, frames, temperature)?;
        self.enter(Phase::PowerSequence);
        self.sequence.power_sequence(bus, temperature)?;
        self.enter(Phase::RefreshPulse);
        self.sequence.refresh_pulse(bus)?;
        self.enter(Phase::PowerDown);
        self.sequence.power_down(bus)?;
        self.enter(Phase::Idle);

        Ok(mode)
    }
}
