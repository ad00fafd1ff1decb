#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{error::Error, fmt::Display, path::PathBuf, time::Instant};

use clap::{Parser, ValueEnum};
use quantview::{BitDepth, MapMethod, Palette, Raster, ViewMode, ViewerPipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum CliMethod {
    Channels,
    Luminance,
    Nearest,
    Threshold,
}

impl From<CliMethod> for MapMethod {
    fn from(value: CliMethod) -> Self {
        match value {
            CliMethod::Channels => MapMethod::Channels,
            CliMethod::Luminance => MapMethod::Luminance,
            CliMethod::Nearest => MapMethod::Nearest,
            CliMethod::Threshold => MapMethod::Threshold,
        }
    }
}

impl Display for CliMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", MapMethod::from(*self))
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CliView {
    Grayscale,
    Quantized,
    Dithered,
    All,
}

impl Display for CliView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliView::Grayscale => "grayscale",
                CliView::Quantized => "quantized",
                CliView::Dithered => "dithered",
                CliView::All => "all",
            }
        )
    }
}

/// Quantize and dither an image, writing the derived images next to each other.
#[derive(Parser)]
pub struct Options {
    /// Bits per channel for the uniform quantization methods (1-8).
    #[arg(short, long, default_value_t = BitDepth::default(), value_parser = parse_bit_depth)]
    bits: BitDepth,

    /// The quantization method used for the quantized and dithered images.
    #[arg(short, long, default_value_t = CliMethod::Channels)]
    method: CliMethod,

    /// Palette colors for the nearest method, e.g. `--palette "#000,#fff,#ff0"`.
    #[arg(short, long, value_delimiter = ',')]
    palette: Vec<String>,

    /// Which derived images to write.
    #[arg(long, default_value_t = CliView::All)]
    view: CliView,

    /// Convert to grayscale and quantize across multiple threads.
    #[arg(long)]
    parallel: bool,

    /// Log pipeline stage timings (overridden by `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,

    /// The image to read.
    input: PathBuf,

    /// Output directory; files are named `<input stem>.<view>.png`.
    output: PathBuf,
}

fn parse_bit_depth(s: &str) -> Result<BitDepth, String> {
    let value: u8 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let Options {
        bits,
        method,
        palette,
        view,
        parallel,
        verbose,
        input,
        output,
    } = Options::parse();

    let default_level = if verbose { "quantview=trace,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let time = Instant::now();
    let image = image::open(&input)?.into_rgba8();
    let source = Raster::try_from(&image)?;
    info!(path = %input.display(), width = source.width(), height = source.height(), elapsed = ?time.elapsed(), "read image");

    let mut pipeline = ViewerPipeline::new(source);
    pipeline
        .set_bit_depth(bits)
        .set_method(method.into())
        .parallel(parallel);

    if !palette.is_empty() {
        pipeline.set_palette(Palette::from_hex(&palette)?);
    }

    let views: &[ViewMode] = match view {
        CliView::Grayscale => &[ViewMode::Grayscale],
        CliView::Quantized => &[ViewMode::Quantized],
        CliView::Dithered => &[ViewMode::Dithered],
        CliView::All => &[ViewMode::Grayscale, ViewMode::Quantized, ViewMode::Dithered],
    };

    let stem = input
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy().into_owned());

    std::fs::create_dir_all(&output)?;

    for &view in views {
        let time = Instant::now();
        let raster = pipeline.set_view(view).displayed().clone();
        let path = output.join(format!("{stem}.{view}.png"));
        raster.into_rgbaimage().save(&path)?;
        info!(path = %path.display(), elapsed = ?time.elapsed(), "wrote {view} image");
    }

    Ok(())
}
