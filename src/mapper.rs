//! The built-in [`PixelMapper`] policies.
//!
//! - [`Grayscale`]: fixed weight luminance conversion.
//! - [`LuminanceLevels`]: N-bit quantization of the red channel, replicated to gray.
//! - [`ChannelLevels`]: N-bit quantization of each color channel independently.
//! - [`NearestColor`]: nearest palette color by euclidean RGB distance.
//! - [`Threshold`]: 1-bit black and white on the red channel.
//!
//! [`Mapper`] wraps all of them so that a host can store the active policy as a single value.

use crate::{BitDepth, Palette, Pixel, PixelMapper};
use ordered_float::OrderedFloat;

/// Rounds and saturates an `f32` channel value into `0..=255`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Quantizes a channel value to the nearest of `levels + 1` evenly spaced values in `0..=255`.
#[inline]
fn quantize_channel(value: u8, levels: f32) -> u8 {
    let level = (f32::from(value) / 255.0 * levels).round();
    saturate(level / levels * 255.0)
}

/// Converts pixels to gray using fixed luminance weights:
/// `0.2162 * r + 0.7152 * g + 0.0722 * b`, rounded and clamped.
///
/// The weights are applied to the encoded channel values directly,
/// no gamma decoding takes place. Alpha is left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grayscale;

impl Grayscale {
    /// The red channel weight.
    pub const RED: f32 = 0.2162;
    /// The green channel weight.
    pub const GREEN: f32 = 0.7152;
    /// The blue channel weight.
    pub const BLUE: f32 = 0.0722;

    /// Returns the gray value for a pixel.
    #[must_use]
    pub fn luma(pixel: Pixel) -> u8 {
        saturate(
            Self::RED * f32::from(pixel.red)
                + Self::GREEN * f32::from(pixel.green)
                + Self::BLUE * f32::from(pixel.blue),
        )
    }
}

impl PixelMapper for Grayscale {
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        let gray = Self::luma(pixel);
        Pixel::new(gray, gray, gray, pixel.alpha)
    }
}

/// N-bit gray quantization.
///
/// Only the red channel is read as the pixel's intensity,
/// so this mapper expects a raster that was already converted with [`Grayscale`].
/// Fed a color raster, it quantizes the red channel and outputs it as gray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LuminanceLevels(BitDepth);

impl LuminanceLevels {
    /// Creates a new [`LuminanceLevels`] for the given bit depth.
    #[must_use]
    pub const fn new(depth: BitDepth) -> Self {
        Self(depth)
    }

    /// The bit depth of this mapper.
    #[must_use]
    pub const fn depth(&self) -> BitDepth {
        self.0
    }
}

impl PixelMapper for LuminanceLevels {
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        let q = quantize_channel(pixel.red, self.0.levels().into());
        Pixel::new(q, q, q, pixel.alpha)
    }
}

/// N-bit uniform color quantization, applied to red, green, and blue independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLevels(BitDepth);

impl ChannelLevels {
    /// Creates a new [`ChannelLevels`] for the given bit depth.
    #[must_use]
    pub const fn new(depth: BitDepth) -> Self {
        Self(depth)
    }

    /// The bit depth of this mapper.
    #[must_use]
    pub const fn depth(&self) -> BitDepth {
        self.0
    }
}

impl PixelMapper for ChannelLevels {
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        let levels = self.0.levels().into();
        Pixel::new(
            quantize_channel(pixel.red, levels),
            quantize_channel(pixel.green, levels),
            quantize_channel(pixel.blue, levels),
            pixel.alpha,
        )
    }
}

/// Squared euclidean distance between the RGB components of two pixels.
fn squared_euclidean_distance(x: Pixel, y: Pixel) -> f32 {
    let x = [x.red, x.green, x.blue];
    let y = [y.red, y.green, y.blue];
    let mut dist = 0.0;
    for c in 0..3 {
        let d = f32::from(x[c]) - f32::from(y[c]);
        dist += d * d;
    }
    dist
}

/// Replaces each pixel with the closest palette color.
///
/// Closeness is euclidean distance over red, green, and blue; alpha is ignored.
/// When several palette colors are equally close, the earliest one wins.
/// The palette color is returned verbatim, so its alpha replaces the pixel's alpha.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NearestColor(Palette);

impl NearestColor {
    /// Creates a new [`NearestColor`] for the given palette.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self(palette)
    }

    /// The palette of this mapper.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.0
    }

    /// Returns the index of the closest palette color.
    #[must_use]
    pub fn nearest_index(&self, pixel: Pixel) -> usize {
        // min_by_key returns the first of several equal minimums
        self.0
            .colors()
            .iter()
            .enumerate()
            .min_by_key(|&(_, &color)| OrderedFloat(squared_euclidean_distance(color, pixel)))
            .map_or(0, |(i, _)| i)
    }
}

impl PixelMapper for NearestColor {
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        self.0.colors()[self.nearest_index(pixel)]
    }
}

/// 1-bit black and white: red values below `128` become opaque black,
/// everything else opaque white.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Threshold;

impl PixelMapper for Threshold {
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        if pixel.red < 128 {
            Pixel::new(0, 0, 0, 255)
        } else {
            Pixel::new(255, 255, 255, 255)
        }
    }
}

/// Any one of the built-in mappers.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapper {
    /// See [`Grayscale`].
    Grayscale(Grayscale),
    /// See [`LuminanceLevels`].
    Luminance(LuminanceLevels),
    /// See [`ChannelLevels`].
    Channels(ChannelLevels),
    /// See [`NearestColor`].
    Nearest(NearestColor),
    /// See [`Threshold`].
    Threshold(Threshold),
}

impl PixelMapper for Mapper {
    #[inline]
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        match self {
            Mapper::Grayscale(m) => m.map_pixel(pixel),
            Mapper::Luminance(m) => m.map_pixel(pixel),
            Mapper::Channels(m) => m.map_pixel(pixel),
            Mapper::Nearest(m) => m.map_pixel(pixel),
            Mapper::Threshold(m) => m.map_pixel(pixel),
        }
    }
}

impl From<Grayscale> for Mapper {
    fn from(mapper: Grayscale) -> Self {
        Self::Grayscale(mapper)
    }
}

impl From<LuminanceLevels> for Mapper {
    fn from(mapper: LuminanceLevels) -> Self {
        Self::Luminance(mapper)
    }
}

impl From<ChannelLevels> for Mapper {
    fn from(mapper: ChannelLevels) -> Self {
        Self::Channels(mapper)
    }
}

impl From<NearestColor> for Mapper {
    fn from(mapper: NearestColor) -> Self {
        Self::Nearest(mapper)
    }
}

impl From<Threshold> for Mapper {
    fn from(mapper: Threshold) -> Self {
        Self::Threshold(mapper)
    }
}
