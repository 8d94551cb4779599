//! Greyscale noise generation.
//!
//! Each pixel is an independent sample `floor((max - min) * U) + min` with `U`
//! uniform on `[0, 1)`. The mapping is slightly biased and only yields `max`
//! when `min == max`; it is kept as-is so output intensities stay comparable
//! with images produced by earlier deployments.

use image::{GrayImage, Luma};
use rand::Rng;

/// Inclusive intensity bounds, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseRange {
    min: u8,
    max: u8,
}

impl NoiseRange {
    /// Returns `None` when `min > max`.
    pub fn new(min: u8, max: u8) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Draw one intensity.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        let u: f64 = rng.r#gen();
        let offset = (f64::from(self.max - self.min) * u).floor() as u8;
        offset + self.min
    }
}

impl Default for NoiseRange {
    fn default() -> Self {
        Self { min: 0, max: 255 }
    }
}

/// Generate a `width` x `height` single-channel noise raster.
pub fn generate_noise<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    range: NoiseRange,
    rng: &mut R,
) -> GrayImage {
    GrayImage::from_fn(width, height, |_, _| Luma([range.sample(rng)]))
}
