//! Contains the per-pixel stages: plain quantization and grayscale conversion.

use crate::{mapper::Grayscale, PixelMapper, Raster};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Applies `mapper` to every pixel of `raster`, returning a new raster of the same dimensions.
///
/// Each pixel is mapped independently; no error is carried between pixels.
/// See [`dither`](crate::dither) for the error diffusing counterpart.
///
/// # Examples
/// ```
/// # use quantview::{quantize, mapper::Threshold, Pixel, Raster};
/// let raster = Raster::from_fn(2, 1, |_, col| Pixel::new(100 + 50 * col as u8, 0, 0, 255));
/// let quantized = quantize(&raster, &Threshold);
/// assert_eq!(quantized.pixels(), [Pixel::new(0, 0, 0, 255), Pixel::new(255, 255, 255, 255)]);
/// ```
#[must_use]
pub fn quantize(raster: &Raster, mapper: &impl PixelMapper) -> Raster {
    let pixels = raster.iter().map(|&pixel| mapper.map_pixel(pixel)).collect();
    Raster::new_unchecked(raster.width(), raster.height(), pixels)
}

/// Converts every pixel of `raster` to gray using the [`Grayscale`] mapper.
#[must_use]
pub fn convert_to_grayscale(raster: &Raster) -> Raster {
    quantize(raster, &Grayscale)
}

/// Applies `mapper` to every pixel of `raster` in parallel.
///
/// The output is identical to [`quantize`].
#[cfg(feature = "threads")]
#[must_use]
pub fn quantize_par(raster: &Raster, mapper: &(impl PixelMapper + Sync)) -> Raster {
    let pixels = raster
        .par_iter()
        .map(|&pixel| mapper.map_pixel(pixel))
        .collect();

    Raster::new_unchecked(raster.width(), raster.height(), pixels)
}

/// Converts every pixel of `raster` to gray in parallel.
///
/// The output is identical to [`convert_to_grayscale`].
#[cfg(feature = "threads")]
#[must_use]
pub fn convert_to_grayscale_par(raster: &Raster) -> Raster {
    quantize_par(raster, &Grayscale)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{mapper::ChannelLevels, tests::*, BitDepth, Pixel};

    #[test]
    fn empty_inputs() {
        let mapper = ChannelLevels::default();
        for (width, height) in [(0, 0), (5, 0), (0, 5)] {
            let raster = Raster::new(width, height, Vec::new()).unwrap();
            assert_eq!(quantize(&raster, &mapper).dimensions(), (width, height));
            assert_eq!(convert_to_grayscale(&raster).dimensions(), (width, height));

            #[cfg(feature = "threads")]
            {
                assert_eq!(quantize_par(&raster, &mapper).dimensions(), (width, height));
                assert_eq!(convert_to_grayscale_par(&raster).dimensions(), (width, height));
            }
        }
    }

    #[test]
    fn dimensions_preserved() {
        let raster = test_raster(13, 7);
        let mapper = ChannelLevels::new(BitDepth::try_from(3).unwrap());
        assert_eq!(quantize(&raster, &mapper).dimensions(), (13, 7));
        assert_eq!(convert_to_grayscale(&raster).dimensions(), (13, 7));
    }

    #[test]
    fn pixelwise() {
        let raster = test_raster(9, 11);
        let mapper = ChannelLevels::new(BitDepth::try_from(2).unwrap());
        let quantized = quantize(&raster, &mapper);
        for (&before, &after) in raster.iter().zip(quantized.iter()) {
            assert_eq!(mapper.map_pixel(before), after);
        }

        let gray = convert_to_grayscale(&raster);
        for (&before, &after) in raster.iter().zip(gray.iter()) {
            assert_eq!(Grayscale.map_pixel(before), after);
            assert_eq!(after.red, after.green);
            assert_eq!(after.green, after.blue);
            assert_eq!(after.alpha, before.alpha);
        }
    }

    #[test]
    fn input_is_not_modified() {
        let raster = test_raster(4, 4);
        let copy = raster.clone();
        let _ = quantize(&raster, &|_: Pixel| gray(0));
        assert_eq!(raster, copy);
    }

    #[test]
    fn grayscale_twice_is_stable_for_dark_images() {
        let raster = Raster::from_fn(16, 16, |row, col| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((row * 16 + col) % 139) as u8;
            Pixel::new(v, v, v, 255)
        });
        let once = convert_to_grayscale(&raster);
        assert_eq!(once, raster);
        assert_eq!(convert_to_grayscale(&once), once);
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_matches_single() {
        let raster = test_raster(64, 48);
        let mapper = ChannelLevels::new(BitDepth::try_from(3).unwrap());
        assert_eq!(quantize_par(&raster, &mapper), quantize(&raster, &mapper));
        assert_eq!(convert_to_grayscale_par(&raster), convert_to_grayscale(&raster));

        let ramp = gray_ramp(300, 2);
        assert_eq!(quantize_par(&ramp, &mapper), quantize(&ramp, &mapper));
    }
}
