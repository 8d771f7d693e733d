//! Two plane frame buffer
//!
//! The buffer holds `page_colour_size` bytes of black plane followed by
//! `page_colour_size` bytes of red plane. Each plane stores one row per native
//! line, eight pixels per byte, most significant bit first.
//!
//! Panels with two controllers split every row in two: the left half columns
//! of all rows come first, followed by the right half columns of all rows, so
//! that each controller receives one contiguous `frame_size` slice per plane.

use alloc::vec::Vec;
use bit_field::BitField;
use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::orientation::{Orientation, OutOfBounds};
use crate::profile::{Profile, COLOUR_PLANES};

/// Index of the byte written by the liveness self-test
const CHECK_INDEX: usize = 1;
const CHECK_PATTERN: u8 = 0xAA;

/// One of the two colour planes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Black/white plane, sent as the first frame
    Black,
    /// Red plane, sent as the second frame
    Red,
}

/// Frame buffer failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Not enough memory for the buffer
    Allocation {
        /// Bytes requested
        bytes: usize,
    },
    /// The buffer did not hold a written value within the retry budget
    NotReady,
}

impl core::fmt::Display for BufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BufferError::Allocation { bytes } => {
                write!(f, "could not allocate a frame buffer of {bytes} bytes")
            }
            BufferError::NotReady => write!(f, "frame buffer memory is not ready"),
        }
    }
}

/// Off-screen image of the panel, with orientation and inversion applied to
/// every pixel operation.
pub struct FrameBuffer {
    data: Vec<u8>,
    profile: Profile,
    orientation: Orientation,
    invert: bool,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer sized for `profile`
    pub fn new(profile: &Profile) -> Result<FrameBuffer, BufferError> {
        let bytes = profile.page_colour_size * COLOUR_PLANES;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| BufferError::Allocation { bytes })?;
        data.resize(bytes, 0);

        Ok(FrameBuffer {
            data,
            profile: *profile,
            orientation: Orientation::default(),
            invert: false,
        })
    }

    /// Check that the backing memory holds what is written to it.
    ///
    /// Some boards hand out external RAM that only settles some time after
    /// start-up. The check is retried `retries` times, `delay_ms` apart.
    /// The buffer is zeroed afterwards.
    pub fn check<D: DelayNs>(
        &mut self,
        delay: &mut D,
        retries: u8,
        delay_ms: u32,
    ) -> Result<(), BufferError> {
        let mut ready = false;
        for attempt in 0..retries.max(1) {
            let Some(cell) = self.data.get_mut(CHECK_INDEX) else {
                break;
            };
            *cell = CHECK_PATTERN;
            delay.delay_ms(delay_ms);
            if core::hint::black_box(self.data[CHECK_INDEX]) == CHECK_PATTERN {
                log::trace!("frame buffer ready after {} attempt(s)", attempt + 1);
                ready = true;
                break;
            }
        }
        self.data.fill(0);

        if ready {
            Ok(())
        } else {
            Err(BufferError::NotReady)
        }
    }

    /// The profile this buffer was sized for
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The whole buffer, black plane first
    pub fn buffer(&self) -> &[u8] {
        &self.data
    }

    /// One colour plane
    pub fn plane(&self, plane: Plane) -> &[u8] {
        let page = self.profile.page_colour_size;
        match plane {
            Plane::Black => &self.data[..page],
            Plane::Red => &self.data[page..],
        }
    }

    /// Set the orientation used by future pixel operations.
    ///
    /// Anything already drawn stays as it is in the buffer.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Get current orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Swap the meaning of black and white for future operations
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Whether black and white are swapped
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Logical width for the current orientation
    pub fn width(&self) -> u16 {
        self.logical_size().0
    }

    /// Logical height for the current orientation
    pub fn height(&self) -> u16 {
        self.logical_size().1
    }

    fn logical_size(&self) -> (u16, u16) {
        self.orientation
            .logical_size(self.profile.screen_width, self.profile.screen_height)
    }

    /// Byte offset within a plane and bit index of buffer position `(row, column)`
    pub(crate) fn address_of(&self, row: u16, column: u16) -> (usize, usize) {
        let profile = &self.profile;
        let bit = 7 - (column % 8) as usize;

        if profile.is_dual_controller {
            let half = profile.screen_width >> 1;
            let (column, base) = if column >= half {
                (column - half, profile.page_colour_size >> 1)
            } else {
                (column, 0)
            };
            let offset = base + row as usize * (profile.buffer_stride >> 1) + (column >> 3) as usize;
            (offset, bit)
        } else {
            (row as usize * profile.buffer_stride + (column >> 3) as usize, bit)
        }
    }

    /// Set or clear one bit of a plane
    pub(crate) fn set_bit(&mut self, plane: Plane, offset: usize, bit: usize, value: bool) {
        let index = self.plane_base(plane) + offset;
        self.data[index].set_bit(bit, value);
    }

    /// Read one bit of a plane
    pub(crate) fn read_bit(&self, plane: Plane, offset: usize, bit: usize) -> bool {
        self.data[self.plane_base(plane) + offset].get_bit(bit)
    }

    fn plane_base(&self, plane: Plane) -> usize {
        match plane {
            Plane::Black => 0,
            Plane::Red => self.profile.page_colour_size,
        }
    }

    /// Set a pixel at logical `(x, y)`.
    ///
    /// Off-screen coordinates leave the buffer untouched.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), OutOfBounds> {
        let (row, column) = self.to_native(x, y)?;
        let (offset, bit) = self.address_of(row, column);
        let (black, red) = color.planes(row as usize, column as usize, self.invert);

        self.set_bit(Plane::Black, offset, bit, black);
        self.set_bit(Plane::Red, offset, bit, red);
        Ok(())
    }

    /// Get the basic colour of the pixel at logical `(x, y)`
    pub fn get_pixel(&self, x: u16, y: u16) -> Result<Color, OutOfBounds> {
        let (row, column) = self.to_native(x, y)?;
        let (offset, bit) = self.address_of(row, column);

        Ok(Color::from_planes(
            self.read_bit(Plane::Black, offset, bit),
            self.read_bit(Plane::Red, offset, bit),
            self.invert,
        ))
    }

    fn to_native(&self, x: u16, y: u16) -> Result<(u16, u16), OutOfBounds> {
        self.orientation.transform(
            x,
            y,
            self.profile.screen_width,
            self.profile.screen_height,
        )
    }

    /// Fill the whole buffer with one colour
    pub fn clear(&mut self, color: Color) {
        let page = self.profile.page_colour_size;
        let (black, red) = self.data.split_at_mut(page);

        if color.is_basic() {
            let (b, r) = color.row_bytes(0, self.invert);
            black.fill(b);
            red.fill(r);
            return;
        }

        // checkerboards alternate with the row, split halves restart at row 0
        let row_len = if self.profile.is_dual_controller {
            self.profile.buffer_stride >> 1
        } else {
            self.profile.buffer_stride
        };
        let rows = self.profile.screen_height as usize;
        for (i, (b, r)) in black
            .chunks_mut(row_len)
            .zip(red.chunks_mut(row_len))
            .enumerate()
        {
            let (black_byte, red_byte) = color.row_bytes(i % rows, self.invert);
            b.fill(black_byte);
            r.fill(red_byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{EPD_213, EPD_969};
    use alloc::vec;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn buffer(id: crate::profile::DeviceId) -> FrameBuffer {
        FrameBuffer::new(&Profile::resolve(id)).unwrap()
    }

    fn assert_injective(fb: &FrameBuffer) {
        let p = *fb.profile();
        let mut seen = vec![false; p.page_colour_size * 8];
        for row in 0..p.screen_height {
            for column in 0..p.screen_width {
                let (offset, bit) = fb.address_of(row, column);
                assert!(offset < p.page_colour_size);
                let index = offset * 8 + bit;
                assert!(!seen[index], "({row}, {column}) collides");
                seen[index] = true;
            }
        }
    }

    #[test]
    fn size() {
        assert_eq!(buffer(EPD_213).buffer().len(), 5512);
        assert_eq!(buffer(EPD_969).plane(Plane::Red).len(), 80640);
    }

    #[test]
    fn addressing_is_injective() {
        assert_injective(&buffer(EPD_213));
        assert_injective(&buffer(EPD_969));
    }

    #[test]
    fn split_addressing() {
        let fb = buffer(EPD_969);
        assert_eq!(fb.address_of(0, 0), (0, 7));
        assert_eq!(fb.address_of(1, 9), (61, 6));
        assert_eq!(fb.address_of(0, 480), (40320, 7));
        assert_eq!(fb.address_of(2, 487), (40320 + 120, 0));
    }

    #[test]
    fn plain_addressing() {
        let fb = buffer(EPD_213);
        assert_eq!(fb.address_of(0, 0), (0, 7));
        assert_eq!(fb.address_of(1, 0), (13, 7));
        assert_eq!(fb.address_of(2, 103), (2 * 13 + 12, 0));
    }

    #[test]
    fn pixel_round_trip() {
        for id in [EPD_213, EPD_969] {
            let mut fb = buffer(id);
            for o in 0..4u8 {
                fb.set_orientation(Orientation::from(o));
                for invert in [false, true] {
                    fb.set_invert(invert);
                    for color in [Color::Black, Color::Red, Color::White] {
                        for (x, y) in [(0, 0), (fb.width() - 1, fb.height() - 1), (7, 3)] {
                            fb.set_pixel(x, y, color).unwrap();
                            assert_eq!(fb.get_pixel(x, y), Ok(color));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_bounds_is_untouched() {
        let mut fb = buffer(EPD_213);
        let w = fb.width();
        assert_eq!(
            fb.set_pixel(w, 0, Color::Black),
            Err(OutOfBounds { x: w, y: 0 })
        );
        assert!(fb.get_pixel(0, fb.height()).is_err());
        assert!(fb.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_white_is_zero() {
        let mut fb = buffer(EPD_213);
        fb.clear(Color::Black);
        fb.clear(Color::White);
        assert!(fb.buffer().iter().all(|&b| b == 0));
        assert_eq!(fb.get_pixel(50, 100), Ok(Color::White));
    }

    #[test]
    fn clear_red() {
        let mut fb = buffer(EPD_213);
        fb.clear(Color::Red);
        assert!(fb.plane(Plane::Black).iter().all(|&b| b == 0x00));
        assert!(fb.plane(Plane::Red).iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn clear_matches_pixel_path() {
        for id in [EPD_213, EPD_969] {
            for invert in [false, true] {
                for color in [Color::Grey, Color::DarkRed, Color::LightRed, Color::Black] {
                    let mut cleared = buffer(id);
                    cleared.set_invert(invert);
                    cleared.clear(color);

                    let mut drawn = buffer(id);
                    drawn.set_invert(invert);
                    let (w, h) = (drawn.width(), drawn.height());
                    for x in 0..w {
                        for y in 0..h {
                            drawn.set_pixel(x, y, color).unwrap();
                        }
                    }
                    assert!(cleared.buffer() == drawn.buffer(), "{color:?} {invert}");
                }
            }
        }
    }

    #[test]
    fn liveness_check_zeroes() {
        let mut fb = buffer(EPD_213);
        fb.clear(Color::Black);
        assert_eq!(fb.check(&mut NoopDelay::new(), 8, 100), Ok(()));
        assert!(fb.buffer().iter().all(|&b| b == 0));
    }
}
