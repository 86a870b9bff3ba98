//! Pixel sampling: one intensity channel and its dark/light classification.
//!
//! The decoded image is reduced once to a single 8-bit plane
//! ([`intensity_plane`]) so the two scan passes never touch colour data.
//! [`PixelSampler`] then classifies each read against the configured
//! threshold.

use crate::config::Channel;
use image::{DynamicImage, GrayImage, Luma};

/// Anything that can hand out one 8-bit intensity per pixel.
///
/// Callers never request coordinates outside `width() × height()`.
pub trait IntensitySource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn intensity(&self, x: u32, y: u32) -> u8;
}

impl IntensitySource for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn intensity(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[0]
    }
}

/// Reduce a decoded image to the single channel used for classification.
///
/// Pixels are read at 16 bits and truncated to the high byte, so 8-bit and
/// 16-bit sources of the same picture produce the same plane. Alpha is
/// ignored.
pub fn intensity_plane(img: &DynamicImage, channel: Channel) -> GrayImage {
    let rgba = img.to_rgba16();
    let (width, height) = rgba.dimensions();
    let mut plane = GrayImage::new(width, height);

    for (x, y, px) in rgba.enumerate_pixels() {
        let r = (px.0[0] >> 8) as u32;
        let value = match channel {
            Channel::Red => r,
            Channel::Luma => {
                let g = (px.0[1] >> 8) as u32;
                let b = (px.0[2] >> 8) as u32;
                // ITU-R BT.601
                (299 * r + 587 * g + 114 * b) / 1000
            }
        };
        plane.put_pixel(x, y, Luma([value as u8]));
    }

    plane
}

/// One classified pixel read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub value: u8,
    pub dark: bool,
}

impl Sample {
    /// The sample assumed beyond the first row or column: light, at the threshold.
    pub fn light_border(threshold: u8) -> Self {
        Self {
            value: threshold,
            dark: false,
        }
    }
}

/// Classifies reads from an [`IntensitySource`] against a fixed threshold.
pub struct PixelSampler<'a, S: IntensitySource + ?Sized> {
    source: &'a S,
    threshold: u8,
}

impl<'a, S: IntensitySource + ?Sized> PixelSampler<'a, S> {
    pub fn new(source: &'a S, threshold: u8) -> Self {
        Self { source, threshold }
    }

    pub fn width(&self) -> u32 {
        self.source.width()
    }

    pub fn height(&self) -> u32 {
        self.source.height()
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Sample the pixel at `(x, y)`.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Sample {
        let value = self.source.intensity(x, y);
        Sample {
            value,
            dark: value < self.threshold,
        }
    }
}
