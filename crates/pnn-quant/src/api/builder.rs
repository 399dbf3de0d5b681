//! PnnQuant builder: the primary entry point of the crate.
//!
//! [`PnnQuant`] owns the options of a quantization run and drives the
//! pipeline: alpha analysis, palette construction, index resolution.

use super::QuantizeError;
use crate::color::ChannelWeights;
use crate::context::{QuantContext, DEFAULT_ALPHA_THRESHOLD};
use crate::dither::{resolve_raster, BlueNoiseModulator, ErrorDiffuser};
use crate::output::QuantizedImage;
use crate::palette::{ColorIndexResolver, MatchMode, Palette, PaletteError, MAX_PALETTE_SIZE};
use crate::quantize::{PnnQuantizer, Quantizer};
use crate::source::PixelSource;

/// Largest palette size that can be requested.
pub const MAX_COLORS: usize = MAX_PALETTE_SIZE;

/// Raster resolution alternates between the two closest entries only for
/// palettes at least this large.
const CLOSEST_MATCH_MIN_PALETTE: usize = 256;

/// High-level quantization builder.
///
/// # Design
///
/// - Constructor takes the target palette size; it is validated when
///   [`quantize()`](Self::quantize) runs
/// - Configuration methods consume and return `self`
/// - [`quantize()`](Self::quantize) takes `&self`, so one builder can
///   process many images; each call owns all of its state
///
/// # Example
///
/// ```
/// use pnn_quant::{Argb, PixelSource, PnnQuant};
///
/// let pixels = [
///     Argb::rgb(255, 0, 0), Argb::rgb(255, 0, 0),
///     Argb::rgb(0, 0, 255), Argb::rgb(0, 0, 255),
/// ];
/// let source = PixelSource::new(&pixels, 2, 2).unwrap();
///
/// let image = PnnQuant::new(2).dither(false).quantize(&source).unwrap();
/// assert_eq!(image.palette().len(), 2);
/// assert_eq!(image.indices()[0], image.indices()[1]);
/// assert_ne!(image.indices()[0], image.indices()[2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PnnQuant {
    max_colors: usize,
    dither: bool,
    alpha_threshold: u8,
    detect_transparency: bool,
    weights: Option<ChannelWeights>,
    blue_noise_weight: f32,
}

impl PnnQuant {
    /// Quantizer targeting `max_colors` entries.
    ///
    /// Defaults: error diffusion on, alpha threshold `0x0F`, transparency
    /// detection on, weights chosen per image, blue-noise weight 1.
    pub fn new(max_colors: usize) -> Self {
        Self {
            max_colors,
            dither: true,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            detect_transparency: true,
            weights: None,
            blue_noise_weight: 1.0,
        }
    }

    /// Use Gilbert-curve error diffusion (`true`) or the raster resolve
    /// with blue-noise modulation (`false`).
    #[inline]
    pub fn dither(mut self, enabled: bool) -> Self {
        self.dither = enabled;
        self
    }

    /// Alpha at or below which a pixel counts as fully transparent.
    #[inline]
    pub fn alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    /// Designate a transparent color when the image has one.
    #[inline]
    pub fn detect_transparency(mut self, enabled: bool) -> Self {
        self.detect_transparency = enabled;
        self
    }

    /// Override the per-image channel weight preset.
    #[inline]
    pub fn weights(mut self, weights: ChannelWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Scale the blue-noise modulation of the non-dithered path.
    #[inline]
    pub fn blue_noise_weight(mut self, weight: f32) -> Self {
        self.blue_noise_weight = weight;
        self
    }

    /// Requested palette size.
    #[inline]
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// Quantize `source` with the PNN palette builder.
    pub fn quantize(&self, source: &PixelSource<'_>) -> Result<QuantizedImage, QuantizeError> {
        self.quantize_with(source, &PnnQuantizer)
    }

    /// Quantize `source` with any [`Quantizer`] building the palette.
    pub fn quantize_with<Q: Quantizer>(
        &self,
        source: &PixelSource<'_>,
        quantizer: &Q,
    ) -> Result<QuantizedImage, QuantizeError> {
        if self.max_colors == 0 || self.max_colors > MAX_COLORS {
            return Err(QuantizeError::InvalidColorCount(self.max_colors));
        }

        let mut ctx = self.context(source, self.max_colors);
        let palette = quantizer.build_palette(source, &mut ctx);
        if palette.is_empty() {
            return Ok(QuantizedImage::new(
                Vec::new(),
                source.width(),
                source.height(),
                palette,
                self.max_colors,
            ));
        }

        let indices = self.resolve(source, &palette, &ctx);
        tracing::debug!(
            colors = palette.len(),
            requested = self.max_colors,
            dither = self.dither,
            "Quantized image"
        );
        Ok(QuantizedImage::new(
            indices,
            source.width(),
            source.height(),
            palette,
            self.max_colors,
        ))
    }

    /// Map `source` onto an existing palette without building a new one.
    ///
    /// The builder's `max_colors` is ignored; channel weights are chosen
    /// for the palette's size unless overridden.
    pub fn remap(&self, source: &PixelSource<'_>, palette: &Palette) -> Result<QuantizedImage, QuantizeError> {
        if palette.is_empty() {
            return Err(PaletteError::Empty.into());
        }
        let ctx = self.context(source, palette.len());
        let indices = self.resolve(source, palette, &ctx);
        Ok(QuantizedImage::new(
            indices,
            source.width(),
            source.height(),
            palette.clone(),
            palette.len(),
        ))
    }

    fn context(&self, source: &PixelSource<'_>, max_colors: usize) -> QuantContext {
        QuantContext::new(
            source,
            max_colors,
            self.alpha_threshold,
            self.detect_transparency,
            self.weights,
        )
    }

    fn resolve(&self, source: &PixelSource<'_>, palette: &Palette, ctx: &QuantContext) -> Vec<u16> {
        let mut resolver = ColorIndexResolver::new(palette, ctx);
        let keys = ctx.lookup_keys();

        if self.dither {
            return ErrorDiffuser::new().dither(source, &mut resolver, keys);
        }

        let mode = if ctx.has_transparency() || palette.len() < CLOSEST_MATCH_MIN_PALETTE {
            MatchMode::Nearest
        } else {
            MatchMode::Closest
        };
        let mut indices = resolve_raster(source, &mut resolver, mode);
        BlueNoiseModulator::new()
            .with_weight(self.blue_noise_weight)
            .apply(source, &mut indices, &mut resolver, mode, keys);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Argb;

    #[test]
    fn test_rejects_out_of_range_targets() {
        let pixels = [Argb::BLACK];
        let source = PixelSource::new(&pixels, 1, 1).unwrap();
        assert_eq!(
            PnnQuant::new(0).quantize(&source),
            Err(QuantizeError::InvalidColorCount(0))
        );
        assert_eq!(
            PnnQuant::new(MAX_COLORS + 1).quantize(&source),
            Err(QuantizeError::InvalidColorCount(MAX_COLORS + 1))
        );
        assert!(PnnQuant::new(MAX_COLORS).quantize(&source).is_ok());
    }

    #[test]
    fn test_zero_size_image() {
        let source = PixelSource::new(&[], 0, 5).unwrap();
        let image = PnnQuant::new(16).quantize(&source).unwrap();
        assert!(image.palette().is_empty());
        assert!(image.indices().is_empty());
        assert_eq!(image.height(), 5);
    }

    #[test]
    fn test_remap_onto_given_palette() {
        let palette = Palette::new(vec![Argb::BLACK, Argb::WHITE]).unwrap();
        let pixels = [Argb::rgb(10, 10, 10), Argb::rgb(250, 250, 250)];
        let source = PixelSource::new(&pixels, 2, 1).unwrap();
        let image = PnnQuant::new(2).dither(false).remap(&source, &palette).unwrap();
        assert_eq!(image.indices(), &[0, 1]);
        assert_eq!(image.palette(), &palette);
    }

    #[test]
    fn test_builder_is_reusable() {
        let quant = PnnQuant::new(4).dither(false).blue_noise_weight(0.5);
        let a = [Argb::rgb(1, 2, 3)];
        let b = [Argb::rgb(200, 100, 0), Argb::rgb(0, 100, 200)];
        let ia = quant.quantize(&PixelSource::new(&a, 1, 1).unwrap()).unwrap();
        let ib = quant.quantize(&PixelSource::new(&b, 2, 1).unwrap()).unwrap();
        assert_eq!(ia.palette().len(), 1);
        assert_eq!(ib.palette().len(), 2);
    }
}
