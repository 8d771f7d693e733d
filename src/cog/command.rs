//! SPI Commands for the COG driven panels, 5.65" and larger
use crate::traits;

#[derive(Copy, Clone)]
pub(crate) enum Command {
    /// Data control, also selects the film type
    Dctl = 0x01,
    Vcom = 0x02,
    Oscillator = 0x03,
    PowerControl = 0x05,
    DcDc = 0x09,
    FirstFrame = 0x10,
    SecondFrame = 0x11,
    /// RAM read/write window
    RamRw = 0x12,
    /// Display update window
    Duw = 0x13,
    DisplayRefresh = 0x15,
    TemperatureSelect = 0x44,
    TemperatureWrite = 0x45,
    SoftStart = 0x51,
    Tcon = 0x60,
    StvDirection = 0x61,
    /// Display refresh window
    Drfw = 0x90,
    ApplyRegister = 0xA7,
    Booster = 0xC2,
    Bvss = 0xD6,
    MasterSlaveSync = 0xD8,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}
