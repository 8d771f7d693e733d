//! Graphics Support for EPDs

use crate::buffer::FrameBuffer;
use crate::color::Color;
use embedded_graphics_core::prelude::*;

/// For use with embedded_grahics
impl DrawTarget for FrameBuffer {
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            // off screen pixels are clipped
            let _ = self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        FrameBuffer::clear(self, color);
        Ok(())
    }
}

/// For use with embedded_grahics
impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width().into(), self.height().into())
    }
}
