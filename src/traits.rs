use crate::Pixel;

/// A pure mapping from one pixel to another, such as a quantization or color conversion rule.
///
/// Implementations must be referentially transparent: the same input always yields the same
/// output, regardless of how many times or in what order the mapper is called.
/// [`dither`](crate::dither) relies on this to produce deterministic output.
///
/// Every `Fn(Pixel) -> Pixel` closure is a [`PixelMapper`],
/// so the built-in policies in [`mapper`](crate::mapper) and ad hoc closures
/// can be passed to [`quantize`](crate::quantize) or [`dither`](crate::dither) interchangeably.
pub trait PixelMapper {
    /// Maps a single pixel.
    fn map_pixel(&self, pixel: Pixel) -> Pixel;
}

impl<F> PixelMapper for F
where
    F: Fn(Pixel) -> Pixel,
{
    #[inline]
    fn map_pixel(&self, pixel: Pixel) -> Pixel {
        self(pixel)
    }
}
