//! Raster pixel buffers
//!
//! `PixelBuffer` is the pixel snapshot type used by raster layers and by
//! content actions. Cloning always produces an independent copy of the
//! pixel data.

use crate::color::Color;
use image::{imageops, RgbaImage};

/// An RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Creates a buffer filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color.to_rgba8()),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width() && y < self.height() {
            self.image.put_pixel(x, y, color.to_rgba8());
        }
    }

    /// Copies `source` over this buffer with its top-left corner at the
    /// origin. Pixels outside this buffer are clipped; pixels not covered by
    /// `source` are left untouched.
    pub fn write_at_origin(&mut self, source: &PixelBuffer) {
        imageops::replace(&mut self.image, &source.image, 0, 0);
    }
}
