//! Contains various types needed across the crate.

use crate::{PipelineError, MAX_PIXELS};
use palette::Srgba;
use std::{fmt::Display, ops::Deref};
#[cfg(feature = "image")]
use {
    image::RgbaImage,
    palette::cast::{ComponentsAs, IntoComponents},
};

/// A single 8-bit RGBA pixel.
pub type Pixel = Srgba<u8>;

/// An owned, row-major grid of [`Pixel`]s with explicit dimensions.
///
/// The pixel at `(row, col)` lives at index `row * width + col`,
/// and the buffer always holds exactly `width * height` pixels.
/// Rasters are never mutated once built; each pipeline stage returns a new one.
///
/// # Examples
/// ```
/// # use quantview::{Pixel, Raster};
/// # fn main() -> Result<(), quantview::PipelineError> {
/// let raster = Raster::new(2, 1, vec![Pixel::new(0, 0, 0, 255), Pixel::new(255, 255, 255, 255)])?;
/// assert_eq!(raster.get(0, 1), Some(Pixel::new(255, 255, 255, 255)));
///
/// // the buffer length must match the dimensions
/// assert!(Raster::new(3, 1, vec![Pixel::new(0, 0, 0, 255)]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Raster {
    /// The number of pixels in each row.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels in row-major order.
    pixels: Vec<Pixel>,
}

impl Raster {
    /// Creates a new [`Raster`] from row-major pixels.
    ///
    /// # Errors
    /// Returns [`PipelineError::DimensionMismatch`] if `pixels.len() != width * height`
    /// or if the dimensions exceed [`MAX_PIXELS`].
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, PipelineError> {
        let area = u64::from(width) * u64::from(height);
        if area <= u64::from(MAX_PIXELS) && pixels.len() as u64 == area {
            Ok(Self { width, height, pixels })
        } else {
            Err(PipelineError::DimensionMismatch { len: pixels.len(), width, height })
        }
    }

    /// Creates a [`Raster`] without checking the buffer length against the dimensions.
    pub(crate) fn new_unchecked(width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self { width, height, pixels }
    }

    /// Creates a `0x0` raster.
    #[must_use]
    pub const fn empty() -> Self {
        Self { width: 0, height: 0, pixels: Vec::new() }
    }

    /// Creates a [`Raster`] by calling `f(row, col)` for each pixel in row-major order.
    ///
    /// # Panics
    /// Panics if `width * height` exceeds [`MAX_PIXELS`].
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        assert!(
            u64::from(width) * u64::from(height) <= u64::from(MAX_PIXELS),
            "raster dimensions {width}x{height} exceed MAX_PIXELS"
        );

        let pixels = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .map(|(row, col)| f(row, col))
            .collect();

        Self::new_unchecked(width, height, pixels)
    }

    /// The number of pixels in each row.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Returns the pixel at `(row, col)`, or `None` if it is out of bounds.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<Pixel> {
        if row < self.height && col < self.width {
            Some(self.pixels[row as usize * self.width as usize + col as usize])
        } else {
            None
        }
    }

    /// Returns an iterator over the rows of the raster.
    ///
    /// The iterator always yields [`height`](Raster::height) rows,
    /// so a zero width raster yields that many empty rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> + '_ {
        let width = self.width as usize;
        (0..self.height as usize).map(move |row| &self.pixels[row * width..(row + 1) * width])
    }

    /// Consumes the raster and returns its pixel buffer.
    #[must_use]
    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }
}

impl Deref for Raster {
    type Target = [Pixel];

    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl AsRef<[Pixel]> for Raster {
    fn as_ref(&self) -> &[Pixel] {
        self
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbaImage> for Raster {
    type Error = PipelineError;

    fn try_from(image: &RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().len();
        let buf: &[Pixel] = image.as_raw()[..(pixels * 4)].components_as();
        Self::new(width, height, buf.to_vec())
    }
}

#[cfg(feature = "image")]
impl Raster {
    /// Converts the raster into an [`RgbaImage`].
    #[must_use]
    pub fn into_rgbaimage(self) -> RgbaImage {
        let Self { width, height, pixels } = self;
        let buf: Vec<u8> = pixels.into_components();

        #[allow(clippy::expect_used)]
        {
            // pixels.len() is equal to width * height,
            // so buf is large enough by nature of its construction
            RgbaImage::from_vec(width, height, buf).expect("large enough buffer")
        }
    }
}

/// The number of bits per channel to quantize to.
///
/// This is a simple new type wrapper around `u8` with the invariant that it must be
/// in the range `1..=8`. A depth of `n` leaves `2^n` distinct values per channel.
///
/// # Examples
/// ```
/// # use quantview::BitDepth;
/// # fn main() -> Result<(), quantview::PipelineError> {
/// let depth = BitDepth::try_from(3)?;
/// assert_eq!(depth.levels(), 7);
/// assert!(BitDepth::try_from(0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BitDepth(u8);

impl BitDepth {
    /// The smallest supported bit depth.
    pub const MIN: Self = Self(1);

    /// The largest supported bit depth.
    pub const MAX: Self = Self(8);

    /// Gets the inner `u8` value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// The index of the highest quantization level, `2^n - 1`.
    #[must_use]
    pub const fn levels(self) -> u16 {
        (1 << self.0) - 1
    }

    /// Iterates over every supported bit depth in increasing order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = PipelineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PipelineError::InvalidBitDepth(value))
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(val: BitDepth) -> Self {
        val.into_inner()
    }
}

impl Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered, non-empty set of reference colors for nearest color quantization.
///
/// Order only matters for tie-breaking: when two entries are equally close,
/// the one appearing first wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette(Vec<Pixel>);

impl Palette {
    /// Black, white, yellow, magenta, and cyan (all opaque).
    pub const DEFAULT_COLORS: [Pixel; 5] = [
        Pixel::new(0, 0, 0, 255),
        Pixel::new(255, 255, 255, 255),
        Pixel::new(253, 249, 0, 255),
        Pixel::new(255, 0, 255, 255),
        Pixel::new(0, 255, 255, 255),
    ];

    /// Creates a new [`Palette`] from the given colors.
    ///
    /// # Errors
    /// Returns [`PipelineError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: Vec<Pixel>) -> Result<Self, PipelineError> {
        if colors.is_empty() {
            Err(PipelineError::EmptyPalette)
        } else {
            Ok(Self(colors))
        }
    }

    /// Parses a palette from hex color strings like `#ff8800`, `ff8800`, or `#f80`.
    /// Parsed colors are opaque.
    ///
    /// # Errors
    /// Returns [`PipelineError::ParseColor`] for the first malformed string,
    /// or [`PipelineError::EmptyPalette`] if no strings were given.
    ///
    /// # Examples
    /// ```
    /// # use quantview::{Palette, Pixel};
    /// # fn main() -> Result<(), quantview::PipelineError> {
    /// let palette = Palette::from_hex(["#000", "#ffffff", "ff0000"])?;
    /// assert_eq!(palette.colors()[2], Pixel::new(255, 0, 0, 255));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: impl IntoIterator<Item = S>) -> Result<Self, PipelineError> {
        hex.into_iter()
            .map(|s| parse_hex_color(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .and_then(Self::new)
    }

    /// The palette colors in order.
    #[must_use]
    pub fn colors(&self) -> &[Pixel] {
        &self.0
    }

    /// Returns the number of colors in the palette (never zero).
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(Self::DEFAULT_COLORS.to_vec())
    }
}

impl TryFrom<Vec<Pixel>> for Palette {
    type Error = PipelineError;

    fn try_from(colors: Vec<Pixel>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

/// Parses `#rgb` or `#rrggbb` (the `#` is optional) into an opaque pixel.
fn parse_hex_color(s: &str) -> Result<Pixel, PipelineError> {
    let err = || PipelineError::ParseColor(s.to_owned());
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(err());
    }

    let digit = |i: usize| {
        hex.get(i..=i)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(err)
    };

    let [r, g, b] = match hex.len() {
        3 => [digit(0)? * 17, digit(1)? * 17, digit(2)? * 17],
        6 => [
            (digit(0)? << 4) | digit(1)?,
            (digit(2)? << 4) | digit(3)?,
            (digit(4)? << 4) | digit(5)?,
        ],
        _ => return Err(err()),
    };

    Ok(Pixel::new(r, g, b, 255))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raster_rejects_wrong_length() {
        let pixels = vec![Pixel::new(0, 0, 0, 255); 5];
        assert_eq!(
            Raster::new(2, 3, pixels),
            Err(PipelineError::DimensionMismatch { len: 5, width: 2, height: 3 })
        );
    }

    #[test]
    fn zero_area_rasters() {
        let empty = Raster::new(0, 0, Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty, Raster::empty());
        assert_eq!(empty.rows().count(), 0);

        let no_rows = Raster::new(7, 0, Vec::new()).unwrap();
        assert_eq!(no_rows.dimensions(), (7, 0));
        assert_eq!(no_rows.get(0, 0), None);
        assert_eq!(no_rows.rows().count(), 0);

        let no_cols = Raster::new(0, 4, Vec::new()).unwrap();
        assert_eq!(no_cols.rows().count(), 4);
        assert!(no_cols.rows().all(<[Pixel]>::is_empty));
        assert_eq!(no_cols.get(0, 0), None);
    }

    #[test]
    #[should_panic(expected = "exceed MAX_PIXELS")]
    fn from_fn_rejects_oversized_dimensions() {
        let _ = Raster::from_fn(u32::MAX, 2, |_, _| Pixel::new(0, 0, 0, 255));
    }

    #[cfg(feature = "image")]
    #[test]
    fn rgbaimage_round_trip() {
        use crate::tests::test_raster;

        let raster = test_raster(5, 3);
        let image = raster.clone().into_rgbaimage();
        assert_eq!(image.dimensions(), (5, 3));
        assert_eq!(image.get_pixel(4, 2).0, {
            let p = raster.get(2, 4).unwrap();
            [p.red, p.green, p.blue, p.alpha]
        });

        let back = Raster::try_from(&image).unwrap();
        assert_eq!(back.dimensions(), (5, 3));
        assert_eq!(back, raster);

        for (width, height) in [(0, 0), (4, 0), (0, 4)] {
            let empty = Raster::new(width, height, Vec::new()).unwrap();
            let image = empty.clone().into_rgbaimage();
            assert_eq!(image.dimensions(), (width, height));
            assert_eq!(Raster::try_from(&image).unwrap(), empty);
        }
    }

    #[test]
    fn from_fn_is_row_major() {
        #[allow(clippy::cast_possible_truncation)]
        let raster = Raster::from_fn(3, 2, |row, col| Pixel::new(row as u8, col as u8, 0, 255));

        assert_eq!(raster.len(), 6);
        assert_eq!(raster[4], Pixel::new(1, 1, 0, 255));
        assert_eq!(raster.get(1, 2), Some(Pixel::new(1, 2, 0, 255)));
        assert_eq!(raster.get(2, 0), None);
        assert_eq!(raster.get(0, 3), None);

        let rows = raster.rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn bit_depth_range() {
        assert_eq!(BitDepth::try_from(0), Err(PipelineError::InvalidBitDepth(0)));
        assert_eq!(BitDepth::try_from(9), Err(PipelineError::InvalidBitDepth(9)));
        assert_eq!(BitDepth::all().count(), 8);
        assert_eq!(BitDepth::MIN.levels(), 1);
        assert_eq!(BitDepth::MAX.levels(), 255);
        assert_eq!(BitDepth::default().into_inner(), 2);
    }

    #[test]
    fn palette_must_not_be_empty() {
        assert_eq!(Palette::new(Vec::new()), Err(PipelineError::EmptyPalette));
        assert_eq!(Palette::from_hex(Vec::<String>::new()), Err(PipelineError::EmptyPalette));
        assert_eq!(Palette::default().len(), 5);
    }

    #[test]
    fn parse_hex() {
        assert_eq!(parse_hex_color("#0f8").unwrap(), Pixel::new(0, 255, 136, 255));
        assert_eq!(parse_hex_color("FDF900").unwrap(), Pixel::new(253, 249, 0, 255));
        for bad in ["", "#12", "#12345", "#gggggg", "#ééé"] {
            assert_eq!(parse_hex_color(bad), Err(PipelineError::ParseColor(bad.to_owned())));
        }
    }
}
