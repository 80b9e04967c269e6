//! Host-side copy of a rendered frame.

use crate::error::{RenderError, RenderResult};

/// Which image row comes first in a readback buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// First row is the top of the image (wgpu, image files).
    TopDown,
    /// First row is the bottom of the image (OpenGL `glReadPixels`).
    BottomUp,
}

/// RGB8 pixels read back from a renderer.
///
/// `pixels` holds `width * height * 3` bytes, row-major, rows ordered as
/// declared by `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    origin: RowOrigin,
}

impl Framebuffer {
    /// Wraps RGB8 pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, origin: RowOrigin) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(RenderError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            origin,
        })
    }

    /// Wraps RGBA8 pixel data, dropping the alpha channel.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
        origin: RowOrigin,
    ) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::SizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::new(width, height, pixels, origin)
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row order of `pixels`.
    #[must_use]
    pub fn origin(&self) -> RowOrigin {
        self.origin
    }

    /// Raw RGB8 bytes in stored row order.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at column `x` of stored row `row`.
    #[must_use]
    pub fn pixel(&self, x: u32, row: u32) -> [u8; 3] {
        let i = (row as usize * self.width as usize + x as usize) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Reverses the row order in place and toggles `origin`.
    pub fn flip_vertical(&mut self) {
        let row_bytes = self.width as usize * 3;
        let rows = self.height as usize;
        for top in 0..rows / 2 {
            let bottom = rows - 1 - top;
            let (upper, lower) = self.pixels.split_at_mut(bottom * row_bytes);
            upper[top * row_bytes..(top + 1) * row_bytes].swap_with_slice(&mut lower[..row_bytes]);
        }
        self.origin = match self.origin {
            RowOrigin::TopDown => RowOrigin::BottomUp,
            RowOrigin::BottomUp => RowOrigin::TopDown,
        };
    }

    /// Returns the frame with top-down row order, flipping if needed.
    #[must_use]
    pub fn into_top_down(mut self) -> Self {
        if self.origin == RowOrigin::BottomUp {
            self.flip_vertical();
        }
        self
    }
}
