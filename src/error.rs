//! The error type for rejected pipeline parameters.

use thiserror::Error;

/// An error for a parameter that violates a precondition of the pipeline.
///
/// All of these are rejected eagerly when the offending value is constructed,
/// so the quantize, grayscale, and dither operations themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The bit depth was outside of `1..=8`.
    #[error("bit depth must be between 1 and 8, got {0}")]
    InvalidBitDepth(u8),

    /// A palette was created without any colors.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// The pixel buffer does not hold exactly `width * height` pixels.
    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        /// The length of the provided buffer.
        len: usize,
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },

    /// A hex color string could not be parsed.
    #[error("invalid hex color {0:?} (expected #rgb or #rrggbb)")]
    ParseColor(String),
}
