use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::config::Config;
use crate::engine::Phase;
use crate::error::Error;
use crate::traits::{Command, ControllerBus};

/// Settle time around every chip-select edge, in µs
const SETTLE_US: u32 = 50;
/// Extra settle time for the dual controller panels, in µs
const SPLIT_SETTLE_US: u32 = 450;
/// Settle time of the master/slave sequential framing, in µs
const SEQUENTIAL_SETTLE_US: u32 = 500;

/// Pins wired between the host and the EXT3 board
///
/// Chip selects are active low, data/command is high for data,
/// busy is high when the panel is ready.
pub struct PinAssignment<OUT, BUSY> {
    /// Chip select of the panel, or of the master controller
    pub panel_cs: OUT,
    /// Chip select of the slave controller, dual controller panels only
    pub panel_cs_slave: Option<OUT>,
    /// Data/Command Control Pin (High for data, Low for command)
    pub dc: OUT,
    /// Pin for Resetting
    pub reset: OUT,
    /// High when the panel is ready
    pub busy: BUSY,
    /// Chip select of the on-board flash, held idle
    pub flash_cs: Option<OUT>,
    /// Chip select of the slave on-board flash, held idle
    pub flash_cs_slave: Option<OUT>,
    /// Chip select of an SD card on the same bus, held idle
    pub card_cs: Option<OUT>,
}

/// Controller(s) addressed by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// The panel, or master and slave at once
    Both,
    /// Master controller alone
    Master,
    /// Slave controller alone
    Slave,
}

/// Delays of the five reset stages, in ms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResetTiming(pub [u32; 5]);

/// The connection to the controller(s) of one panel
pub(crate) struct DisplayInterface<SPI, OUT, BUSY, DELAY> {
    spi: SPI,
    pins: PinAssignment<OUT, BUSY>,
    delay: DELAY,
    /// Master and slave share every combined frame
    split: bool,
    busy_poll_ms: u32,
    busy_polls: u32,
}

type IfResult<SPI, OUT, BUSY> = Result<
    (),
    Error<
        <SPI as embedded_hal::spi::ErrorType>::Error,
        <OUT as embedded_hal::digital::ErrorType>::Error,
        <BUSY as embedded_hal::digital::ErrorType>::Error,
    >,
>;

impl<SPI, OUT, BUSY, DELAY> DisplayInterface<SPI, OUT, BUSY, DELAY>
where
    SPI: SpiBus<u8>,
    OUT: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    pub fn new(
        spi: SPI,
        pins: PinAssignment<OUT, BUSY>,
        delay: DELAY,
        split: bool,
        config: &Config,
    ) -> Self {
        DisplayInterface {
            spi,
            pins,
            delay,
            split,
            busy_poll_ms: config.poll_interval_ms(),
            busy_polls: config.busy_polls(),
        }
    }

    /// Give back bus, pins and delay
    pub fn release(self) -> (SPI, PinAssignment<OUT, BUSY>, DELAY) {
        (self.spi, self.pins, self.delay)
    }

    /// Deselect every device on the bus
    pub fn idle_lines(&mut self) -> IfResult<SPI, OUT, BUSY> {
        let pins = &mut self.pins;
        pins.panel_cs.set_high().map_err(Error::Pin)?;
        for cs in [
            &mut pins.panel_cs_slave,
            &mut pins.flash_cs,
            &mut pins.flash_cs_slave,
            &mut pins.card_cs,
        ]
        .into_iter()
        .flatten()
        {
            cs.set_high().map_err(Error::Pin)?;
        }
        Ok(())
    }

    fn dc(&mut self, data: bool) -> IfResult<SPI, OUT, BUSY> {
        if data {
            self.pins.dc.set_high().map_err(Error::Pin)
        } else {
            self.pins.dc.set_low().map_err(Error::Pin)
        }
    }

    fn select(&mut self, target: Target, active: bool) -> IfResult<SPI, OUT, BUSY> {
        let cs = match target {
            Target::Slave => match self.pins.panel_cs_slave.as_mut() {
                Some(cs) => cs,
                None => return Ok(()),
            },
            _ => &mut self.pins.panel_cs,
        };
        if active {
            cs.set_low().map_err(Error::Pin)
        } else {
            cs.set_high().map_err(Error::Pin)
        }
    }

    /// Combined framing: one transfer seen by the panel, or by master and
    /// slave together on dual controller panels
    fn send_combined(&mut self, index: u8, data: &[u8]) -> IfResult<SPI, OUT, BUSY> {
        let slave = self.split && self.pins.panel_cs_slave.is_some();

        self.dc(false)?;
        self.select(Target::Master, true)?;
        if self.split {
            self.select(Target::Slave, true)?;
            self.delay.delay_us(SPLIT_SETTLE_US);
        }
        self.delay.delay_us(SETTLE_US);
        self.write(&[index])?;
        self.delay.delay_us(SETTLE_US);
        if slave {
            self.delay.delay_us(SPLIT_SETTLE_US);
            self.select(Target::Slave, false)?;
        }
        self.select(Target::Master, false)?;

        self.dc(true)?;
        self.select(Target::Master, true)?;
        if slave {
            self.select(Target::Slave, true)?;
            self.delay.delay_us(SPLIT_SETTLE_US);
        }
        self.delay.delay_us(SETTLE_US);
        self.write(data)?;
        self.delay.delay_us(SETTLE_US);
        if slave {
            self.delay.delay_us(SPLIT_SETTLE_US);
            self.select(Target::Slave, false)?;
        }
        self.select(Target::Master, false)
    }

    /// Sequential framing: one controller selected, the other held deselected
    fn send_to(&mut self, target: Target, index: u8, data: &[u8]) -> IfResult<SPI, OUT, BUSY> {
        let other = match target {
            Target::Slave => Target::Master,
            _ => Target::Slave,
        };
        self.select(other, false)?;

        self.dc(false)?;
        self.select(target, true)?;
        self.delay.delay_us(SEQUENTIAL_SETTLE_US);
        self.write(&[index])?;
        self.delay.delay_us(SEQUENTIAL_SETTLE_US);
        self.select(target, false)?;

        self.dc(true)?;
        self.select(target, true)?;
        self.delay.delay_us(SEQUENTIAL_SETTLE_US);
        self.write(data)?;
        self.delay.delay_us(SEQUENTIAL_SETTLE_US);
        self.select(target, false)
    }

    // spi write helper/abstraction function
    fn write(&mut self, data: &[u8]) -> IfResult<SPI, OUT, BUSY> {
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                self.spi.write(data_chunk).map_err(Error::Spi)?;
            }
        } else {
            self.spi.write(data).map_err(Error::Spi)?;
        }
        // chip select must not move before the last bit is out
        self.spi.flush().map_err(Error::Spi)
    }

    fn is_ready(&mut self) -> Result<bool, Error<SPI::Error, OUT::Error, BUSY::Error>> {
        self.pins.busy.is_high().map_err(Error::Busy)
    }
}

impl<SPI, OUT, BUSY, DELAY> ControllerBus for DisplayInterface<SPI, OUT, BUSY, DELAY>
where
    SPI: SpiBus<u8>,
    OUT: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    type Error = Error<SPI::Error, OUT::Error, BUSY::Error>;

    fn send<T: Command>(
        &mut self,
        target: Target,
        command: T,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        match target {
            Target::Both => self.send_combined(command.address(), data),
            _ => self.send_to(target, command.address(), data),
        }
    }

    /// Resets the panel.
    ///
    /// Waits `t[0]`, raises reset, waits `t[1]`, pulls reset low for `t[2]`,
    /// raises it again and waits `t[3]`, deselects the panel and waits `t[4]`.
    fn reset(&mut self, timing: &ResetTiming) -> Result<(), Self::Error> {
        let [before, high, low, after, settle] = timing.0;

        self.delay.delay_ms(before);
        self.pins.reset.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(high);
        self.pins.reset.set_low().map_err(Error::Pin)?;
        self.delay.delay_ms(low);
        self.pins.reset.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(after);

        self.select(Target::Master, false)?;
        if self.split {
            self.select(Target::Slave, false)?;
        }
        self.delay.delay_ms(settle);
        Ok(())
    }

    /// Waits until the panel isn't busy anymore (busy == HIGH)
    ///
    /// Gives up after the configured timeout.
    fn wait_until_idle(&mut self, phase: Phase) -> Result<(), Self::Error> {
        for poll in 0..self.busy_polls {
            if self.is_ready()? {
                return Ok(());
            }
            log::trace!("panel busy during {phase:?}, poll {poll}");
            self.delay.delay_ms(self.busy_poll_ms);
        }
        if self.is_ready()? {
            return Ok(());
        }

        log::error!("panel still busy after {} polls during {phase:?}", self.busy_polls);
        Err(Error::BusyTimeout { phase })
    }

    fn power_down_lines(&mut self) -> Result<(), Self::Error> {
        self.dc(false)?;
        self.select(Target::Master, true)?;
        if self.split {
            self.select(Target::Slave, true)?;
        }
        self.pins.reset.set_low().map_err(Error::Pin)?;
        if self.split {
            self.select(Target::Slave, false)?;
        }
        self.select(Target::Master, false)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
