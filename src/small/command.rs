//! SPI Commands for the small panels, up to 4.37"
use crate::traits;

#[derive(Copy, Clone)]
pub(crate) enum Command {
    SoftReset = 0x00,
    PowerOff = 0x02,
    PowerOn = 0x04,
    DataStartTransmission1 = 0x10,
    DisplayRefresh = 0x12,
    DataStartTransmission2 = 0x13,
    ActiveTemperature = 0xE0,
    InputTemperature = 0xE5,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Command as CommandTrait;

    #[test]
    fn command_addr() {
        assert_eq!(Command::SoftReset.address(), 0x00);
        assert_eq!(Command::DataStartTransmission2.address(), 0x13);
        assert_eq!(Command::InputTemperature.address(), 0xE5);
    }
}
