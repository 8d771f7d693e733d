//! Mapping between logical coordinates and buffer coordinates
//!
//! Buffer coordinates are `(row, column)`: the row runs along the long native
//! axis (`screen_height` rows), the column along the short axis that is packed
//! eight pixels to a byte (`screen_width` columns).

/// Screen orientation, only 90° increments supported
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Portrait, logical size `screen_width x screen_height`
    #[default]
    Rotate0,
    /// Landscape, logical size `screen_height x screen_width`
    Rotate90,
    /// Portrait, upside down
    Rotate180,
    /// Landscape, upside down
    Rotate270,
}

impl From<u8> for Orientation {
    /// Values wrap around modulo 4
    fn from(value: u8) -> Self {
        match value % 4 {
            0 => Orientation::Rotate0,
            1 => Orientation::Rotate90,
            2 => Orientation::Rotate180,
            _ => Orientation::Rotate270,
        }
    }
}

/// Coordinate outside the logical screen for the current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    /// Logical x
    pub x: u16,
    /// Logical y
    pub y: u16,
}

impl core::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "pixel ({}, {}) is off screen", self.x, self.y)
    }
}

impl core::error::Error for OutOfBounds {}

impl Orientation {
    /// Whether logical x runs along the native long axis
    pub fn is_landscape(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }

    /// Logical `(width, height)` of a `width x height` native screen
    pub fn logical_size(self, width: u16, height: u16) -> (u16, u16) {
        if self.is_landscape() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map logical `(x, y)` to buffer `(row, column)`
    pub fn transform(
        self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(u16, u16), OutOfBounds> {
        let (w, h) = self.logical_size(width, height);
        if x >= w || y >= h {
            return Err(OutOfBounds { x, y });
        }

        Ok(match self {
            Orientation::Rotate0 => (y, x),
            Orientation::Rotate90 => (x, width - 1 - y),
            Orientation::Rotate180 => (height - 1 - y, width - 1 - x),
            Orientation::Rotate270 => (height - 1 - x, y),
        })
    }

    /// Map buffer `(row, column)` back to logical `(x, y)`
    pub fn inverse(self, row: u16, column: u16, width: u16, height: u16) -> (u16, u16) {
        match self {
            Orientation::Rotate0 => (column, row),
            Orientation::Rotate90 => (row, width - 1 - column),
            Orientation::Rotate180 => (width - 1 - column, height - 1 - row),
            Orientation::Rotate270 => (height - 1 - row, column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Orientation; 4] = [
        Orientation::Rotate0,
        Orientation::Rotate90,
        Orientation::Rotate180,
        Orientation::Rotate270,
    ];

    #[test]
    fn wraps_modulo_four() {
        assert_eq!(Orientation::from(5), Orientation::Rotate90);
        assert_eq!(Orientation::from(4), Orientation::Rotate0);
    }

    #[test]
    fn corners() {
        // 104 x 212 native
        assert_eq!(Orientation::Rotate0.transform(0, 0, 104, 212), Ok((0, 0)));
        assert_eq!(Orientation::Rotate0.transform(103, 211, 104, 212), Ok((211, 103)));
        assert_eq!(Orientation::Rotate90.transform(0, 0, 104, 212), Ok((0, 103)));
        assert_eq!(Orientation::Rotate180.transform(0, 0, 104, 212), Ok((211, 103)));
        assert_eq!(Orientation::Rotate270.transform(0, 0, 104, 212), Ok((211, 0)));
    }

    #[test]
    fn bounds_follow_orientation() {
        assert!(Orientation::Rotate0.transform(104, 0, 104, 212).is_err());
        assert!(Orientation::Rotate0.transform(0, 212, 104, 212).is_err());
        assert!(Orientation::Rotate90.transform(211, 103, 104, 212).is_ok());
        assert_eq!(
            Orientation::Rotate90.transform(212, 0, 104, 212),
            Err(OutOfBounds { x: 212, y: 0 })
        );
        assert!(Orientation::Rotate270.transform(0, 104, 104, 212).is_err());
    }

    #[test]
    fn inverse_round_trip() {
        let (width, height) = (16, 24);
        for o in ALL {
            let (w, h) = o.logical_size(width, height);
            for x in 0..w {
                for y in 0..h {
                    let (row, column) = o.transform(x, y, width, height).unwrap();
                    assert!(row < height && column < width);
                    assert_eq!(o.inverse(row, column, width, height), (x, y));
                }
            }
        }
    }
}
