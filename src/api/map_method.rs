//! Contains the parameter enums for the viewer pipeline.

use crate::{
    mapper::{ChannelLevels, LuminanceLevels, Mapper, NearestColor, Threshold},
    BitDepth, Palette,
};
use std::fmt::Display;

/// The set of quantization methods a [`ViewerPipeline`](crate::ViewerPipeline) can use.
///
/// The method only selects the policy; the bit depth and palette come from the pipeline,
/// so that changing either one does not require choosing the method again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapMethod {
    /// N-bit quantization of each color channel.
    ///
    /// See [`ChannelLevels`].
    #[default]
    Channels,
    /// N-bit gray quantization.
    ///
    /// This method quantizes the grayscale raster rather than the source raster.
    /// See [`LuminanceLevels`].
    Luminance,
    /// Nearest color in the pipeline's palette.
    ///
    /// See [`NearestColor`].
    Nearest,
    /// 1-bit black and white.
    ///
    /// See [`Threshold`].
    Threshold,
}

impl MapMethod {
    /// Builds the concrete mapper for this method from the given parameters.
    #[must_use]
    pub fn mapper(self, depth: BitDepth, palette: &Palette) -> Mapper {
        match self {
            MapMethod::Channels => ChannelLevels::new(depth).into(),
            MapMethod::Luminance => LuminanceLevels::new(depth).into(),
            MapMethod::Nearest => NearestColor::new(palette.clone()).into(),
            MapMethod::Threshold => Threshold.into(),
        }
    }

    /// Whether the output of this method depends on the bit depth.
    #[must_use]
    pub const fn uses_bit_depth(self) -> bool {
        matches!(self, MapMethod::Channels | MapMethod::Luminance)
    }

    /// Whether the output of this method depends on the palette.
    #[must_use]
    pub const fn uses_palette(self) -> bool {
        matches!(self, MapMethod::Nearest)
    }

    /// Whether this method expects grayscale input.
    #[must_use]
    pub const fn uses_grayscale_input(self) -> bool {
        matches!(self, MapMethod::Luminance)
    }
}

impl Display for MapMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MapMethod::Channels => "channels",
                MapMethod::Luminance => "luminance",
                MapMethod::Nearest => "nearest",
                MapMethod::Threshold => "threshold",
            }
        )
    }
}

/// Which raster a host should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// The unmodified source raster.
    #[default]
    Original,
    /// The grayscale conversion of the source.
    Grayscale,
    /// The source quantized with the active method.
    Quantized,
    /// The source dithered with the active method.
    Dithered,
}

impl ViewMode {
    /// Returns `mode`, or [`ViewMode::Original`] if `mode` is already the current view.
    #[must_use]
    pub fn toggle(self, mode: ViewMode) -> Self {
        if self == mode {
            ViewMode::Original
        } else {
            mode
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ViewMode::Original => "original",
                ViewMode::Grayscale => "grayscale",
                ViewMode::Quantized => "quantized",
                ViewMode::Dithered => "dithered",
            }
        )
    }
}
