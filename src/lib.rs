//! A driver for the Pervasive Displays iTC e-paper panels on the EXT3 board
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1
//!
//! All panels from 1.54" to 11.98" are supported, in black, white and red.
//! The driver keeps a two plane frame buffer in memory, draws into it in any
//! of four orientations and sends it to the panel on [`flush`](epd::Epd::flush).
//! The 9.69" and 11.98" panels are driven by two controllers; their buffer is
//! split so that each controller receives its half in one piece.
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - The EXT3 board is specified for up to 4 MHz
//!
//! ### Other....
//!
//! - A global allocator: the frame buffer lives on the heap, up to 184 kB for the 11.98" panel
//! - The panel temperature is not measured, tell the driver with
//!   [`set_temperature_celsius`](epd::Epd::set_temperature_celsius)
//!
//! # Examples
//!
//! See [`epd`].
//!
#![no_std]

extern crate alloc;

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod buffer;
pub mod color;
pub mod config;
pub mod engine;
pub mod epd;
pub mod error;
pub mod orientation;
pub mod profile;
pub mod temperature;

/// Interface for the physical connection between display and the controlling device
pub mod interface;

mod cog;
mod small;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::buffer::{FrameBuffer, Plane};
    pub use crate::color::Color;
    pub use crate::config::Config;
    pub use crate::engine::Phase;
    pub use crate::epd::{Epd, EpdError};
    pub use crate::error::Error;
    pub use crate::interface::PinAssignment;
    pub use crate::orientation::{Orientation, OutOfBounds};
    pub use crate::profile::*;
    pub use crate::temperature::{TemperatureClass, UpdateMode};
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
