use crate::engine::Phase;
use crate::interface::{ResetTiming, Target};
use crate::temperature::Temperature;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Everything a refresh sequence needs from the controller(s)
pub(crate) trait ControllerBus {
    type Error;

    /// Send an indexed frame: one command byte followed by its data
    fn send<T: Command>(&mut self, target: Target, command: T, data: &[u8])
        -> Result<(), Self::Error>;

    /// Pulse the reset line
    fn reset(&mut self, timing: &ResetTiming) -> Result<(), Self::Error>;

    /// Block until the busy line reports ready
    fn wait_until_idle(&mut self, phase: Phase) -> Result<(), Self::Error>;

    /// Return every control line to its idle level after a refresh
    fn power_down_lines(&mut self) -> Result<(), Self::Error>;

    fn delay_ms(&mut self, ms: u32);
}

/// Image planes handed to a refresh, each `page_colour_size` bytes
#[derive(Clone, Copy)]
pub(crate) struct Frames<'a> {
    pub black: &'a [u8],
    pub red: &'a [u8],
    /// Bytes per controller and plane
    pub frame_size: usize,
}

/// Panel class specific steps of a refresh.
///
/// The refresh engine calls these in order; each step talks to the panel only
/// through a [`ControllerBus`].
pub(crate) trait PanelSequence {
    fn reset_timing(&self) -> ResetTiming;

    fn load_frames<B: ControllerBus>(
        &self,
        bus: &mut B,
        frames: Frames<'_>,
        temperature: &Temperature,
    ) -> Result<(), B::Error>;

    fn power_sequence<B: ControllerBus>(
        &self,
        bus: &mut B,
        temperature: &Temperature,
    ) -> Result<(), B::Error>;

    fn refresh_pulse<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error>;

    fn power_down<B: ControllerBus>(&self, bus: &mut B) -> Result<(), B::Error>;
}
