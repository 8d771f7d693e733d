//! Logical colours and their two plane encoding
//!
//! Every pixel is stored as one bit in the black plane and one bit in the red
//! plane:
//!
//! | Colour | black bit | red bit |
//! |--------|-----------|---------|
//! | White  | 0         | 0       |
//! | Black  | 1         | 0       |
//! | Red    | 0         | 1       |
//!
//! With `invert` set, white and black swap their encodings; red is unaffected.
//! [`Color::Grey`], [`Color::DarkRed`] and [`Color::LightRed`] have no encoding
//! of their own and are dithered from the basic colours on a checkerboard.

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor};

/// Byte pattern with the odd pixels of an even row set
pub const ODD_PIXELS_EVEN_ROW: u8 = 0b0101_0101;
/// Byte pattern with the odd pixels of an odd row set
pub const ODD_PIXELS_ODD_ROW: u8 = 0b1010_1010;

/// Colours understood by the panels
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// White
    #[default]
    White,
    /// Black
    Black,
    /// Red
    Red,
    /// Black and white checkerboard
    Grey,
    /// Red and black checkerboard
    DarkRed,
    /// Red and white checkerboard
    LightRed,
}

impl Color {
    /// True for the colours with their own plane encoding
    pub fn is_basic(self) -> bool {
        matches!(self, Color::White | Color::Black | Color::Red)
    }

    /// Resolve a composite colour to the basic colour at a checkerboard position.
    ///
    /// `odd` is the parity of `x + y` in buffer coordinates.
    pub fn resolve(self, odd: bool, invert: bool) -> Color {
        match self {
            Color::DarkRed if odd => Color::Red,
            Color::DarkRed if invert => Color::White,
            Color::DarkRed => Color::Black,
            Color::LightRed if odd => Color::Red,
            Color::LightRed if invert => Color::Black,
            Color::LightRed => Color::White,
            Color::Grey if odd => Color::Black,
            Color::Grey => Color::White,
            basic => basic,
        }
    }

    /// Get the `(black, red)` plane bits for a pixel at buffer position `(x, y)`
    pub fn planes(self, x: usize, y: usize, invert: bool) -> (bool, bool) {
        match self.resolve((x + y) % 2 == 1, invert) {
            Color::Red => (false, true),
            Color::Black => (!invert, false),
            _ => (invert, false),
        }
    }

    /// Get the `(black, red)` bytes filling eight pixels of a buffer row.
    ///
    /// Produces the same bits as [`planes`](Color::planes) for every pixel
    /// of the byte, as long as the byte starts on a multiple of eight.
    pub fn row_bytes(self, row: usize, invert: bool) -> (u8, u8) {
        let (mut black, mut red) = (0u8, 0u8);
        for y in 0..8 {
            let (b, r) = self.planes(row, y, invert);
            black |= (b as u8) << (7 - y);
            red |= (r as u8) << (7 - y);
        }
        (black, red)
    }

    /// Decode the basic colour stored in a pair of plane bits
    pub fn from_planes(black: bool, red: bool, invert: bool) -> Color {
        match (black, red) {
            (false, true) => Color::Red,
            (true, false) if !invert => Color::Black,
            (false, false) if invert => Color::Black,
            _ => Color::White,
        }
    }
}

impl From<u8> for Color {
    /// Unknown values are treated as white
    fn from(value: u8) -> Self {
        match value {
            0 => Color::White,
            1 => Color::Black,
            2 => Color::Red,
            3 => Color::Grey,
            4 => Color::DarkRed,
            5 => Color::LightRed,
            e => {
                log::warn!("unknown colour code {e}, using white");
                Color::White
            }
        }
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for Color {
    type Raw = ();
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}
