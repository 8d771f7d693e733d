//! Driver for the Pervasive Displays iTC panels on the EXT3 board
//!
//! # Example
//!
//! ```rust,no_run
//! use embedded_hal::{
//!     delay::DelayNs,
//!     digital::{InputPin, OutputPin},
//!     spi::SpiBus,
//! };
//! use epd_ext3::prelude::*;
//!
//! fn hello<SPI, OUT, BUSY, DELAY>(
//!     spi: SPI,
//!     pins: PinAssignment<OUT, BUSY>,
//!     delay: DELAY,
//! ) -> Option<UpdateMode>
//! where
//!     SPI: SpiBus,
//!     OUT: OutputPin,
//!     BUSY: InputPin,
//!     DELAY: DelayNs,
//! {
//!     let mut epd = Epd::new(spi, pins, delay, EPD_271).ok()?;
//!     epd.set_orientation(Orientation::Rotate90);
//!     for x in 0..epd.width() {
//!         epd.set_pixel(x, 10, Color::Black).ok()?;
//!     }
//!     epd.set_temperature_celsius(22);
//!     epd.flush().ok()
//! }
//! ```

use alloc::string::String;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::buffer::FrameBuffer;
use crate::color::Color;
use crate::config::Config;
use crate::engine::{Engine, Phase};
use crate::error::Error;
use crate::interface::{DisplayInterface, PinAssignment};
use crate::orientation::{Orientation, OutOfBounds};
use crate::profile::{DeviceId, Profile};
use crate::temperature::{Temperature, TemperatureClass, UpdateMode};
use crate::traits::{ControllerBus, Frames};

/// Errors of an [`Epd`] built on these HAL types
pub type EpdError<SPI, OUT, BUSY> = Error<
    <SPI as embedded_hal::spi::ErrorType>::Error,
    <OUT as embedded_hal::digital::ErrorType>::Error,
    <BUSY as embedded_hal::digital::ErrorType>::Error,
>;

/// One iTC panel with its frame buffer
pub struct Epd<SPI, OUT, BUSY, DELAY> {
    /// Connection Interface
    interface: DisplayInterface<SPI, OUT, BUSY, DELAY>,
    buffer: FrameBuffer,
    engine: Engine,
    temperature: Temperature,
    config: Config,
}

impl<SPI, OUT, BUSY, DELAY> Epd<SPI, OUT, BUSY, DELAY>
where
    SPI: SpiBus<u8>,
    OUT: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    /// Set up the panel identified by `id` with the default [`Config`]
    pub fn new(
        spi: SPI,
        pins: PinAssignment<OUT, BUSY>,
        delay: DELAY,
        id: DeviceId,
    ) -> Result<Self, EpdError<SPI, OUT, BUSY>> {
        Self::new_with_config(spi, pins, delay, id, Config::default())
    }

    /// Set up the panel identified by `id`.
    ///
    /// Resolves the panel geometry, allocates and checks the frame buffer,
    /// deselects every device on the bus and resets the panel. The buffer
    /// starts out white, in orientation 0, not inverted, at 25 °C.
    pub fn new_with_config(
        spi: SPI,
        pins: PinAssignment<OUT, BUSY>,
        mut delay: DELAY,
        id: DeviceId,
        config: Config,
    ) -> Result<Self, EpdError<SPI, OUT, BUSY>> {
        let profile = Profile::resolve(id);
        let Some(engine) = Engine::new(&profile) else {
            log::error!("unknown panel {:#08x}", id.0);
            return Err(Error::Configuration {
                size_code: id.size(),
            });
        };

        let mut buffer = FrameBuffer::new(&profile)?;
        buffer.check(
            &mut delay,
            config.buffer_check_retries,
            config.buffer_check_delay_ms,
        )?;

        let mut interface =
            DisplayInterface::new(spi, pins, delay, profile.is_dual_controller, &config);
        interface.idle_lines()?;
        engine.reset(&mut interface)?;

        buffer.set_orientation(Orientation::Rotate0);
        buffer.set_invert(false);
        buffer.clear(Color::White);

        let epd = Epd {
            interface,
            buffer,
            engine,
            temperature: Temperature::default(),
            config,
        };
        log::info!(
            "= Screen {} {}x{}",
            epd.identify(),
            epd.width(),
            epd.height()
        );
        Ok(epd)
    }

    /// Fill the frame buffer with `color`. The panel is not touched.
    pub fn clear(&mut self, color: Color) {
        self.buffer.clear(color);
    }

    /// Set one pixel in logical coordinates
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), OutOfBounds> {
        self.buffer.set_pixel(x, y, color)
    }

    /// Read one pixel in logical coordinates
    pub fn get_pixel(&self, x: u16, y: u16) -> Result<Color, OutOfBounds> {
        self.buffer.get_pixel(x, y)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.buffer.set_orientation(orientation);
    }

    pub fn orientation(&self) -> Orientation {
        self.buffer.orientation()
    }

    /// Swap black and white for the following drawing operations
    pub fn invert(&mut self, invert: bool) {
        self.buffer.set_invert(invert);
    }

    pub fn set_temperature_celsius(&mut self, celsius: i8) {
        self.temperature.set_celsius(celsius);
    }

    pub fn set_temperature_fahrenheit(&mut self, fahrenheit: i16) {
        self.temperature.set_fahrenheit(fahrenheit);
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Send the frame buffer and refresh the whole panel
    pub fn flush(&mut self) -> Result<UpdateMode, EpdError<SPI, OUT, BUSY>> {
        self.flush_with_mode(UpdateMode::Global)
    }

    /// Refresh with `mode` and return the update that was performed.
    ///
    /// Returns [`UpdateMode::None`] without any bus traffic when the
    /// temperature is outside the range of the panel.
    pub fn flush_with_mode(
        &mut self,
        mode: UpdateMode,
    ) -> Result<UpdateMode, EpdError<SPI, OUT, BUSY>> {
        let profile = *self.buffer.profile();
        let (black, red) = self.buffer.buffer().split_at(profile.page_colour_size);
        let frames = Frames {
            black,
            red,
            frame_size: profile.frame_size,
        };
        self.engine.run(
            &mut self.interface,
            frames,
            &self.temperature,
            mode,
            profile.extra_features,
        )
    }

    /// Refresh to black and then to white, for panels left unused for a long time.
    ///
    /// The frame buffer is white afterwards.
    pub fn regenerate(&mut self) -> Result<(), EpdError<SPI, OUT, BUSY>> {
        self.clear(Color::Black);
        self.flush()?;
        self.interface.delay_ms(self.config.regenerate_pause_ms);
        self.clear(Color::White);
        self.flush()?;
        Ok(())
    }

    /// Panel name, e.g. `iTC 2.71" -N`
    pub fn identify(&self) -> String {
        self.buffer.profile().identify()
    }

    /// Logical width for the current orientation
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Logical height for the current orientation
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    pub fn profile(&self) -> &Profile {
        self.buffer.profile()
    }

    /// Temperature class of the panel, with its operating range
    pub fn temperature_class(&self) -> TemperatureClass {
        TemperatureClass::from_features(self.buffer.profile().extra_features)
    }

    /// Phase the last refresh ended in
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Frame buffer, e.g. as an `embedded-graphics` draw target
    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Give back bus, pins and delay
    pub fn release(self) -> (SPI, PinAssignment<OUT, BUSY>, DELAY) {
        self.interface.release()
    }
}
