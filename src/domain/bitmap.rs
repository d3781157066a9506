//! Obstacle bitmap
//!
//! Pixels are packed ABGR like the render buffers handed to the canvas
//! (little-endian 0xAABBGGRR -> bytes [RR, GG, BB, AA]), so a bitmap can be
//! blitted without conversion. Alpha 0 is transparent.

use crate::foundation::{EngineError, EngineResult};

pub const TRANSPARENT: u32 = 0x0000_0000;

#[inline]
pub fn alpha(pixel: u32) -> u8 {
    (pixel >> 24) as u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl ObstacleBitmap {
    /// Fully transparent bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; (width as usize) * (height as usize)],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> EngineResult<Self> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(EngineError::SizeMismatch {
                name: "bitmap pixels",
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 { self.width }

    #[inline]
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: u32) {
        let idx = (y * self.width + x) as usize;
        self.pixels[idx] = pixel;
    }

    #[inline]
    pub fn is_opaque_at(&self, idx: usize) -> bool {
        alpha(self.pixels[idx]) != 0
    }
}
