//! Contains the Floyd–Steinberg error diffusion ditherer.

use crate::{Pixel, PixelMapper, Raster};

/// Floyd–Steinberg dithering.
///
/// Pixels are visited in raster order (top to bottom, left to right, no serpentine).
/// Each pixel is replaced by the output of a [`PixelMapper`], and the difference between
/// the pixel's current value and the mapped value is spread to the unvisited neighbors:
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Each neighbor receives `round(error * weight / 16)` per color channel, saturated to `0..=255`.
/// Shares that would land outside of the raster are dropped. Alpha is never diffused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloydSteinberg;

impl FloydSteinberg {
    /// The diffusion targets as `(row offset, column offset, weight in sixteenths)`.
    pub const KERNEL: [(u32, i32, u8); 4] = [(0, 1, 7), (1, -1, 3), (1, 0, 5), (1, 1, 1)];

    /// Creates a new [`FloydSteinberg`] ditherer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Dithers `raster` with `mapper`, returning a new raster of the same dimensions.
    ///
    /// The output is deterministic: the same raster and mapper always give the same result.
    #[must_use]
    pub fn dither(&self, raster: &Raster, mapper: &impl PixelMapper) -> Raster {
        let (width, height) = raster.dimensions();
        let mut buf = WorkingBuf::new(raster);

        for row in 0..height {
            for col in 0..width {
                let current = buf.get(row, col);
                let quantized = mapper.map_pixel(current);
                buf.set(row, col, quantized);

                let err = channel_error(current, quantized);
                if err != [0; 3] {
                    buf.propagate(row, col, err);
                }
            }
        }

        buf.finish()
    }
}

/// Dithers `raster` with `mapper` using [`FloydSteinberg`].
///
/// # Examples
/// ```
/// # use quantview::{dither, mapper::Threshold, Pixel, Raster};
/// let mid_gray = Raster::from_fn(8, 8, |_, _| Pixel::new(128, 128, 128, 255));
/// let dithered = dither(&mid_gray, &Threshold);
///
/// // roughly half of the pixels end up white
/// let white = dithered.iter().filter(|p| p.red == 255).count();
/// assert!((24..=40).contains(&white));
/// ```
#[must_use]
pub fn dither(raster: &Raster, mapper: &impl PixelMapper) -> Raster {
    FloydSteinberg::new().dither(raster, mapper)
}

/// The per channel difference `original - quantized` for red, green, and blue.
#[inline]
fn channel_error(original: Pixel, quantized: Pixel) -> [i32; 3] {
    [
        i32::from(original.red) - i32::from(quantized.red),
        i32::from(original.green) - i32::from(quantized.green),
        i32::from(original.blue) - i32::from(quantized.blue),
    ]
}

/// Adds `round(err * weight / 16)` to `value`, saturating to `0..=255`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn diffuse(value: u8, err: i32, weight: u8) -> u8 {
    // err * weight / 16 is exact in f32, so rounding is the only inexact step
    let share = (err as f32 * f32::from(weight) / 16.0).round() as i32;
    (i32::from(value) + share).clamp(0, 255) as u8
}

/// The private, mutable copy of the input that the ditherer works on.
///
/// Positions before the current pixel hold final output,
/// positions after it hold input with the diffused error applied so far.
struct WorkingBuf {
    /// The width of a row of pixels.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels in row-major order.
    pixels: Vec<Pixel>,
}

impl WorkingBuf {
    /// Creates a working copy of `raster`.
    fn new(raster: &Raster) -> Self {
        let (width, height) = raster.dimensions();
        Self { width, height, pixels: raster.pixels().to_vec() }
    }

    /// Returns the linear index of `(row, col)`.
    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Returns the current value at `(row, col)`.
    #[inline]
    fn get(&self, row: u32, col: u32) -> Pixel {
        self.pixels[self.index(row, col)]
    }

    /// Overwrites the value at `(row, col)`.
    #[inline]
    fn set(&mut self, row: u32, col: u32, pixel: Pixel) {
        let i = self.index(row, col);
        self.pixels[i] = pixel;
    }

    /// Spreads `err` from `(row, col)` to its in-bounds kernel neighbors.
    #[inline]
    fn propagate(&mut self, row: u32, col: u32, err: [i32; 3]) {
        for (dr, dc, weight) in FloydSteinberg::KERNEL {
            let Some(row) = row.checked_add(dr).filter(|&r| r < self.height) else {
                continue;
            };
            let Some(col) = col.checked_add_signed(dc).filter(|&c| c < self.width) else {
                continue;
            };

            let i = self.index(row, col);
            let pixel = &mut self.pixels[i];
            pixel.red = diffuse(pixel.red, err[0], weight);
            pixel.green = diffuse(pixel.green, err[1], weight);
            pixel.blue = diffuse(pixel.blue, err[2], weight);
        }
    }

    /// Converts the finished buffer into the output raster.
    fn finish(self) -> Raster {
        let Self { width, height, pixels } = self;
        Raster::new_unchecked(width, height, pixels)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        mapper::{ChannelLevels, LuminanceLevels, NearestColor, Threshold},
        quantize,
        tests::*,
        BitDepth, Palette,
    };

    fn one_bit() -> ChannelLevels {
        ChannelLevels::new(BitDepth::MIN)
    }

    #[test]
    fn empty_inputs() {
        for (width, height) in [(0, 0), (3, 0), (0, 3)] {
            let raster = Raster::new(width, height, Vec::new()).unwrap();
            let dithered = dither(&raster, &one_bit());
            assert_eq!(dithered.dimensions(), (width, height));
            assert!(dithered.is_empty());
        }
    }

    #[test]
    fn dimensions_preserved() {
        for (width, height) in [(1, 1), (1, 9), (9, 1), (17, 5)] {
            let raster = test_raster(width, height);
            assert_eq!(dither(&raster, &one_bit()).dimensions(), (width, height));
        }
    }

    #[test]
    fn golden_two_by_two() {
        let raster = Raster::new(
            2,
            2,
            vec![gray(0), gray(255), gray(128), gray(64)],
        )
        .unwrap();

        // (1, 0) quantizes 128 up to 255, sending round(-127 * 7/16) = -56 right: 64 -> 8 -> 0
        let expected = vec![gray(0), gray(255), gray(255), gray(0)];
        assert_eq!(dither(&raster, &one_bit()).into_pixels(), expected);
    }

    #[test]
    fn golden_uniform_gray() {
        let raster = Raster::new(2, 2, vec![gray(100); 4]).unwrap();

        // (0,0): 100 -> 0, err 100: (0,1) += 44, (1,0) += 31, (1,1) += 6
        // (0,1): 144 -> 255, err -111: (1,0) += -21, (1,1) += -35
        // (1,0): 110 -> 0, err 110: (1,1) += 48
        // (1,1): 119 -> 0
        let expected = vec![gray(0), gray(255), gray(0), gray(0)];
        assert_eq!(dither(&raster, &one_bit()).into_pixels(), expected);
    }

    #[test]
    fn kernel_conserves_error() {
        let total: u8 = FloydSteinberg::KERNEL.iter().map(|&(_, _, w)| w).sum();
        assert_eq!(total, 16);

        // an interior pixel on a flat background hands its full error to the four neighbors
        let mut raster = vec![gray(128); 9];
        raster[4] = gray(96);
        let raster = Raster::new(3, 3, raster).unwrap();

        let mut buf = WorkingBuf::new(&raster);
        buf.set(1, 1, gray(0));
        buf.propagate(1, 1, channel_error(gray(96), gray(0)));

        let spread: i32 = [(1, 2), (2, 0), (2, 1), (2, 2)]
            .into_iter()
            .map(|(r, c)| i32::from(buf.get(r, c).red) - 128)
            .sum();
        assert_eq!(spread, 96);
    }

    #[test]
    fn boundary_drops_clipped_shares() {
        // a single row only has a right neighbor, so only the 7/16 share is kept
        let raster = Raster::new(2, 1, vec![gray(64), gray(0)]).unwrap();
        let mut buf = WorkingBuf::new(&raster);
        buf.propagate(0, 0, [64, 64, 64]);
        assert_eq!(buf.get(0, 1), gray(28));

        // the last pixel has no neighbors at all
        let mut buf = WorkingBuf::new(&raster);
        buf.propagate(0, 1, [64, 64, 64]);
        assert_eq!(buf.finish(), raster);

        // the first column has no below-left neighbor
        let raster = Raster::new(2, 2, vec![gray(0); 4]).unwrap();
        let mut buf = WorkingBuf::new(&raster);
        buf.propagate(0, 0, [32, 32, 32]);
        assert_eq!(buf.finish().into_pixels(), vec![gray(0), gray(14), gray(10), gray(2)]);
    }

    #[test]
    fn diffusion_saturates() {
        assert_eq!(diffuse(250, 255, 7), 255);
        assert_eq!(diffuse(5, -255, 5), 0);
        assert_eq!(diffuse(100, -1, 7), 100);
        assert_eq!(diffuse(100, -3, 3), 99);
        assert_eq!(diffuse(100, 8, 1), 101);
    }

    #[test]
    fn alpha_is_not_diffused() {
        let raster = Raster::new(
            2,
            2,
            vec![
                Pixel::new(100, 100, 100, 10),
                Pixel::new(100, 100, 100, 20),
                Pixel::new(100, 100, 100, 30),
                Pixel::new(100, 100, 100, 40),
            ],
        )
        .unwrap();

        let alphas = dither(&raster, &one_bit())
            .iter()
            .map(|p| p.alpha)
            .collect::<Vec<_>>();
        assert_eq!(alphas, [10, 20, 30, 40]);
    }

    #[test]
    fn output_alpha_comes_from_mapper() {
        let raster = test_raster(5, 5);
        let palette = Palette::new(vec![Pixel::new(0, 0, 0, 1), Pixel::new(255, 255, 255, 2)]).unwrap();
        let dithered = dither(&raster, &NearestColor::new(palette));
        assert!(dithered.iter().all(|p| p.alpha == 1 || p.alpha == 2));
    }

    #[test]
    fn palette_containment() {
        let palette = Palette::default();
        let dithered = dither(&test_raster(31, 17), &NearestColor::new(palette.clone()));
        assert!(dithered.iter().all(|p| palette.colors().contains(p)));
    }

    #[test]
    fn deterministic() {
        let raster = test_raster(40, 30);
        let mapper = ChannelLevels::new(BitDepth::try_from(2).unwrap());
        assert_eq!(dither(&raster, &mapper), dither(&raster, &mapper));

        let mapper = NearestColor::default();
        assert_eq!(dither(&raster, &mapper), dither(&raster, &mapper));
    }

    #[test]
    fn exact_match_image_unaffected() {
        // every pixel is already a fixed point of the mapper, so there is no error to diffuse
        let raster = quantize(&test_raster(20, 20), &one_bit());
        assert_eq!(dither(&raster, &one_bit()), raster);
    }

    #[test]
    fn preserves_average_intensity() {
        #[allow(clippy::cast_precision_loss)]
        let mean = |r: &Raster| r.iter().map(|p| f64::from(p.red)).sum::<f64>() / r.len() as f64;

        for v in [64, 100, 200] {
            let flat = Raster::new(64, 64, vec![gray(v); 64 * 64]).unwrap();
            let dithered = mean(&dither(&flat, &one_bit()));
            let quantized = mean(&quantize(&flat, &one_bit()));

            assert!((dithered - f64::from(v)).abs() < 2.0);
            assert!((quantized - f64::from(v)).abs() > 50.0);
        }
    }

    #[test]
    fn threshold_on_mid_gray_alternates() {
        let raster = Raster::new(4, 1, vec![gray(128), gray(128), gray(128), gray(128)]).unwrap();
        let dithered = dither(&raster, &Threshold);
        // 128 -> white (err -127 -> -56), 72 -> black (err 72 -> 32), 160 -> white (err -95 -> -42), 86 -> black
        assert_eq!(dithered.into_pixels(), vec![gray(255), gray(0), gray(255), gray(0)]);
    }

    fn convert_to_grayscale_ramp(width: u32, height: u32) -> Raster {
        crate::convert_to_grayscale(&gray_ramp(width, height))
    }

    #[test]
    fn grayscale_then_luminance_matches_channels_on_gray() {
        let gray = convert_to_grayscale_ramp(64, 8);
        let depth = BitDepth::try_from(2).unwrap();
        assert_eq!(
            dither(&gray, &LuminanceLevels::new(depth)),
            dither(&gray, &ChannelLevels::new(depth))
        );
    }
}
