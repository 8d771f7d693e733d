use core::fmt::{Debug, Display, Formatter};

use crate::buffer::BufferError;
use crate::engine::Phase;

/// Epd error type
///
/// Generic over the error types of the SPI bus, the output pins and the busy pin.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error<SPI, PIN, BUSY> {
    /// Encountered an SPI error
    Spi(SPI),

    /// Encountered an error on one of the output pins (DC, CS, RST)
    Pin(PIN),

    /// Encountered an error reading the busy pin
    Busy(BUSY),

    /// The panel did not report ready in time
    BusyTimeout {
        /// Phase of the refresh that was waiting
        phase: Phase,
    },

    /// The size code of the device identifier is unknown
    Configuration {
        /// Offending size code
        size_code: u8,
    },

    /// The frame buffer could not be set up
    Buffer(BufferError),
}

impl<SPI, PIN, BUSY> From<BufferError> for Error<SPI, PIN, BUSY> {
    fn from(e: BufferError) -> Self {
        Error::Buffer(e)
    }
}

impl<SPI, PIN, BUSY> Display for Error<SPI, PIN, BUSY>
where
    SPI: Debug,
    PIN: Debug,
    BUSY: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(err) => write!(f, "SPI error: {err:?}"),
            Self::Pin(err) => write!(f, "Pin error: {err:?}"),
            Self::Busy(err) => write!(f, "Busy pin error: {err:?}"),
            Self::BusyTimeout { phase } => {
                write!(f, "Timeout waiting for the panel during {phase:?}")
            }
            Self::Configuration { size_code } => {
                write!(f, "Unknown panel size code {size_code:#04x}")
            }
            Self::Buffer(err) => Display::fmt(err, f),
        }
    }
}

impl<SPI, PIN, BUSY> Debug for Error<SPI, PIN, BUSY>
where
    SPI: Debug,
    PIN: Debug,
    BUSY: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(err) => f.debug_tuple("Spi").field(err).finish(),
            Self::Pin(err) => f.debug_tuple("Pin").field(err).finish(),
            Self::Busy(err) => f.debug_tuple("Busy").field(err).finish(),
            Self::BusyTimeout { phase } => {
                f.debug_struct("BusyTimeout").field("phase", phase).finish()
            }
            Self::Configuration { size_code } => f
                .debug_struct("Configuration")
                .field("size_code", size_code)
                .finish(),
            Self::Buffer(err) => f.debug_tuple("Buffer").field(err).finish(),
        }
    }
}

impl<SPI: Debug, PIN: Debug, BUSY: Debug> core::error::Error for Error<SPI, PIN, BUSY> {}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    type E = Error<(), (), ()>;

    #[test]
    fn display() {
        let e: E = Error::Configuration { size_code: 0x99 };
        assert_eq!(e.to_string(), "Unknown panel size code 0x99");
        let e: E = Error::BusyTimeout {
            phase: Phase::RefreshPulse,
        };
        assert_eq!(e.to_string(), "Timeout waiting for the panel during RefreshPulse");
        let e: E = BufferError::Allocation { bytes: 10 }.into();
        assert_eq!(e.to_string(), "could not allocate a frame buffer of 10 bytes");
    }
}
