//! A library for classic image quantization and error diffusion dithering over RGBA rasters.
//!
//! `quantview` provides the pixel transform pipeline behind a quantization viewer:
//! grayscale conversion, N-bit uniform quantization (per channel or luminance only),
//! nearest color palette quantization, and Floyd–Steinberg dithering.
//! Every stage is a pure function from one [`Raster`] to a freshly allocated one.
//!
//! # Features
//! To reduce dependencies and compile times, `quantview` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of the per-pixel stages via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # Pixel Mappers
//! Quantization and dithering are both driven by a [`PixelMapper`], a pure function from one
//! pixel to another. The built-in policies live in the [`mapper`] module,
//! but any `Fn(Pixel) -> Pixel` closure works just as well:
//! ```
//! # use quantview::{dither, quantize, BitDepth, Pixel, Raster, mapper::ChannelLevels};
//! # fn main() -> Result<(), quantview::PipelineError> {
//! let raster = Raster::from_fn(4, 4, |row, col| {
//!     let v = u8::try_from(row * 64 + col * 16).unwrap_or(u8::MAX);
//!     Pixel::new(v, v, v, 255)
//! });
//!
//! let two_bits = ChannelLevels::new(BitDepth::try_from(2)?);
//! let quantized = quantize(&raster, &two_bits);
//! let dithered = dither(&raster, &two_bits);
//!
//! let inverted = quantize(&raster, &|p: Pixel| Pixel::new(255 - p.red, 255 - p.green, 255 - p.blue, p.alpha));
//! # assert_eq!(quantized.dimensions(), dithered.dimensions());
//! # assert_eq!(inverted.dimensions(), raster.dimensions());
//! # Ok(())
//! # }
//! ```
//!
//! # High-Level API
//! Hosts that display the derived images and change parameters interactively
//! should use [`ViewerPipeline`], which caches the derived rasters and regenerates them
//! only after a parameter change.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod dither;
mod error;
mod quantize;
mod traits;
mod types;

pub mod mapper;

pub use api::*;
pub use dither::{dither, FloydSteinberg};
pub use error::PipelineError;
pub use quantize::*;
pub use traits::*;
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;
