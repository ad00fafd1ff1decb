//! Contains the [`ViewerPipeline`] struct that caches derived rasters for a host application.

use crate::{
    convert_to_grayscale, dither::FloydSteinberg, mapper::Mapper, quantize, BitDepth, MapMethod,
    Palette, Raster, ViewMode,
};
#[cfg(feature = "threads")]
use crate::{convert_to_grayscale_par, quantize_par};
use std::time::Instant;
use tracing::{debug, trace};

/// The rasters derived from the active parameters.
#[derive(Debug, Clone)]
struct Derived {
    /// The output of the quantizer.
    quantized: Raster,
    /// The output of the ditherer.
    dithered: Raster,
}

/// Holds a source raster and the rasters derived from it,
/// regenerating the derived rasters only after a parameter change.
///
/// The grayscale raster depends on nothing but the source, so it is computed once.
/// The quantized and dithered rasters depend on the active [`MapMethod`], [`BitDepth`], and [`Palette`].
/// Changing one of those drops both rasters, and they are recomputed the next time either is requested.
///
/// # Examples
/// ```
/// # use quantview::{BitDepth, MapMethod, Pixel, Raster, ViewerPipeline, ViewMode};
/// # fn main() -> Result<(), quantview::PipelineError> {
/// let source = Raster::from_fn(16, 16, |row, col| Pixel::new((row * 16) as u8, (col * 16) as u8, 128, 255));
/// let mut pipeline = ViewerPipeline::new(source);
///
/// pipeline
///     .set_bit_depth(BitDepth::try_from(1)?)
///     .set_method(MapMethod::Channels)
///     .set_view(ViewMode::Dithered);
///
/// let shown = pipeline.displayed();
/// assert_eq!(shown.dimensions(), (16, 16));
///
/// // switch to the nearest color palette, like a host's "palette" key would
/// pipeline.toggle_palette();
/// assert_eq!(pipeline.method(), MapMethod::Nearest);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ViewerPipeline {
    /// The source raster.
    source: Raster,
    /// The grayscale conversion of the source.
    grayscale: Option<Raster>,
    /// The quantization method to use.
    method: MapMethod,
    /// The number of bits per channel for the uniform quantization methods.
    depth: BitDepth,
    /// The palette for the nearest color method.
    palette: Palette,
    /// The raster to present.
    view: ViewMode,
    /// Whether or not to run the per-pixel stages in parallel.
    #[cfg(feature = "threads")]
    parallel: bool,
    /// The cached quantized and dithered rasters.
    derived: Option<Derived>,
}

impl ViewerPipeline {
    /// Creates a new [`ViewerPipeline`] with default parameters:
    /// per channel quantization at a bit depth of `2`, the default [`Palette`],
    /// and the original raster on display.
    pub fn new(source: Raster) -> Self {
        Self {
            source,
            grayscale: None,
            method: MapMethod::default(),
            depth: BitDepth::default(),
            palette: Palette::default(),
            view: ViewMode::default(),
            #[cfg(feature = "threads")]
            parallel: false,
            derived: None,
        }
    }

    /// The source raster.
    #[must_use]
    pub fn source(&self) -> &Raster {
        &self.source
    }

    /// The active quantization method.
    #[must_use]
    pub fn method(&self) -> MapMethod {
        self.method
    }

    /// The active bit depth.
    #[must_use]
    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    /// The active palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The current view.
    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Whether the quantized and dithered rasters are currently cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.derived.is_some()
    }

    /// Drops the cached quantized and dithered rasters.
    fn invalidate(&mut self, reason: &str) {
        if self.derived.take().is_some() {
            debug!(reason, "invalidated derived rasters");
        }
    }

    /// Sets the bit depth used by [`MapMethod::Channels`] and [`MapMethod::Luminance`].
    ///
    /// The default bit depth is `2`.
    pub fn set_bit_depth(&mut self, depth: BitDepth) -> &mut Self {
        if depth != self.depth {
            self.depth = depth;
            if self.method.uses_bit_depth() {
                self.invalidate("bit depth changed");
            }
        }
        self
    }

    /// Sets the palette used by [`MapMethod::Nearest`].
    ///
    /// The default palette is [`Palette::default`].
    pub fn set_palette(&mut self, palette: Palette) -> &mut Self {
        if palette != self.palette {
            self.palette = palette;
            if self.method.uses_palette() {
                self.invalidate("palette changed");
            }
        }
        self
    }

    /// Sets the quantization method.
    ///
    /// The default method is [`MapMethod::Channels`].
    pub fn set_method(&mut self, method: MapMethod) -> &mut Self {
        if method != self.method {
            self.method = method;
            self.invalidate("method changed");
        }
        self
    }

    /// Switches between the per channel and the nearest palette color methods.
    ///
    /// Any method other than [`MapMethod::Nearest`] switches to [`MapMethod::Nearest`].
    pub fn toggle_palette(&mut self) -> &mut Self {
        let method = if self.method == MapMethod::Nearest {
            MapMethod::Channels
        } else {
            MapMethod::Nearest
        };
        self.set_method(method)
    }

    /// Sets which raster [`ViewerPipeline::displayed`] returns.
    pub fn set_view(&mut self, view: ViewMode) -> &mut Self {
        self.view = view;
        self
    }

    /// Sets whether or not to quantize and convert to grayscale across multiple threads.
    /// Dithering always runs on a single thread.
    ///
    /// The output is the same either way. The default value is `false`.
    #[cfg(feature = "threads")]
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    /// Whether the per-pixel stages should run in parallel.
    fn use_threads(&self) -> bool {
        #[cfg(feature = "threads")]
        {
            self.parallel
        }
        #[cfg(not(feature = "threads"))]
        {
            false
        }
    }

    /// Returns the grayscale raster, computing it on first use.
    pub fn grayscale(&mut self) -> &Raster {
        let parallel = self.use_threads();
        let Self { source, grayscale, .. } = self;
        grayscale.get_or_insert_with(|| {
            let start = Instant::now();
            let raster = grayscale_stage(source, parallel);
            trace!(elapsed = ?start.elapsed(), "converted to grayscale");
            raster
        })
    }

    /// Runs the quantizer and the ditherer with the active parameters.
    fn regenerate(&mut self) -> Derived {
        let parallel = self.use_threads();
        if self.method.uses_grayscale_input() {
            self.grayscale();
        }

        let Self { source, grayscale, method, depth, palette, .. } = &*self;
        let input = match grayscale {
            Some(gray) if method.uses_grayscale_input() => gray,
            _ => source,
        };
        let mapper = method.mapper(*depth, palette);

        debug!(%method, %depth, "regenerating derived rasters");

        let start = Instant::now();
        let quantized = quantize_stage(input, &mapper, parallel);
        trace!(elapsed = ?start.elapsed(), "quantized");

        let start = Instant::now();
        let dithered = FloydSteinberg::new().dither(input, &mapper);
        trace!(elapsed = ?start.elapsed(), "dithered");

        Derived { quantized, dithered }
    }

    /// Returns the quantized and dithered rasters, regenerating them if needed.
    fn derived(&mut self) -> &Derived {
        let derived = match self.derived.take() {
            Some(derived) => derived,
            None => self.regenerate(),
        };
        self.derived.insert(derived)
    }

    /// Returns the source quantized with the active method.
    pub fn quantized(&mut self) -> &Raster {
        &self.derived().quantized
    }

    /// Returns the source dithered with the active method.
    pub fn dithered(&mut self) -> &Raster {
        &self.derived().dithered
    }

    /// Returns the raster selected by the current [`ViewMode`].
    pub fn displayed(&mut self) -> &Raster {
        match self.view {
            ViewMode::Original => &self.source,
            ViewMode::Grayscale => self.grayscale(),
            ViewMode::Quantized => self.quantized(),
            ViewMode::Dithered => self.dithered(),
        }
    }

    /// Consumes the pipeline and returns the source raster.
    #[must_use]
    pub fn into_source(self) -> Raster {
        self.source
    }
}

/// Runs the grayscale converter, in parallel if requested and available.
#[allow(unused_variables)]
fn grayscale_stage(source: &Raster, parallel: bool) -> Raster {
    #[cfg(feature = "threads")]
    if parallel {
        return convert_to_grayscale_par(source);
    }
    convert_to_grayscale(source)
}

/// Runs the quantizer, in parallel if requested and available.
#[allow(unused_variables)]
fn quantize_stage(input: &Raster, mapper: &Mapper, parallel: bool) -> Raster {
    #[cfg(feature = "threads")]
    if parallel {
        return quantize_par(input, mapper);
    }
    quantize(input, mapper)
}
