//! Per-call quantization context.
//!
//! Everything one quantization run needs to agree on (alpha handling,
//! channel weights, the requested palette size) lives here and is passed
//! by reference from the histogram through clustering to index resolution.
//! Nothing is process-wide, so concurrent runs never observe each other.

use crate::color::{Argb, BinKeyMode, ChannelWeights};
use crate::source::{scan_alpha, AlphaProfile, PixelSource};

/// Alpha at or below this value counts as fully transparent by default.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 0x0F;

/// The designated transparent pixel of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransparentPixel {
    /// Row-major index of the first fully transparent pixel.
    pub index: usize,
    /// Canonical value every transparent pixel is coerced to.
    pub color: Argb,
}

/// State shared by the stages of one quantization call.
#[derive(Debug, Clone)]
pub struct QuantContext {
    /// Requested palette size.
    pub max_colors: usize,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Alpha at or below this is fully transparent.
    pub alpha_threshold: u8,
    /// The image has partial alpha somewhere.
    pub has_semi_transparency: bool,
    /// The image has at least one fully transparent pixel.
    pub transparent: Option<TransparentPixel>,
    /// Distance weights. The clustering pass may rebalance these.
    pub weights: ChannelWeights,
}

impl QuantContext {
    /// Scan `source` and set up a context for it.
    ///
    /// `weights` overrides the preset chosen by
    /// [`ChannelWeights::for_image`].
    pub fn new(
        source: &PixelSource<'_>,
        max_colors: usize,
        alpha_threshold: u8,
        detect_transparency: bool,
        weights: Option<ChannelWeights>,
    ) -> Self {
        let AlphaProfile {
            has_semi_transparency,
            transparent_pixel,
        } = scan_alpha(source.pixels(), alpha_threshold, detect_transparency);

        let weights = weights
            .unwrap_or_else(|| ChannelWeights::for_image(max_colors, source.width(), source.height()));

        tracing::debug!(
            width = source.width(),
            height = source.height(),
            max_colors,
            has_semi_transparency,
            transparent = transparent_pixel.is_some(),
            "Prepared quantization context"
        );

        Self {
            max_colors,
            width: source.width(),
            height: source.height(),
            alpha_threshold,
            has_semi_transparency,
            transparent: transparent_pixel.map(|index| TransparentPixel {
                index,
                color: Argb::TRANSPARENT,
            }),
            weights,
        }
    }

    /// Whether a fully transparent color is designated.
    #[inline]
    pub fn has_transparency(&self) -> bool {
        self.transparent.is_some()
    }

    /// Whether `color` should be treated as the designated transparent color.
    #[inline]
    pub fn is_transparent(&self, color: Argb) -> bool {
        self.transparent.is_some() && color.a <= self.alpha_threshold
    }

    /// Coerce low-alpha colors to the canonical transparent value.
    #[inline]
    pub fn canonicalize(&self, color: Argb) -> Argb {
        match self.transparent {
            Some(t) if color.a <= self.alpha_threshold => t.color,
            _ => color,
        }
    }

    /// Key packing for histogram bins.
    ///
    /// Small target palettes get the coarser-alpha, finer-chroma 1555 layout
    /// even without transparency.
    pub fn histogram_keys(&self) -> BinKeyMode {
        BinKeyMode::select(
            self.has_semi_transparency,
            self.max_colors < 64 || self.has_transparency(),
        )
    }

    /// Key packing for the small-palette lookup caches of the ditherers.
    pub fn lookup_keys(&self) -> BinKeyMode {
        BinKeyMode::select(self.has_semi_transparency, self.has_transparency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_opaque_source() {
        let pixels = vec![Argb::rgb(1, 2, 3); 4];
        let source = PixelSource::new(&pixels, 2, 2).unwrap();
        let ctx = QuantContext::new(&source, 256, DEFAULT_ALPHA_THRESHOLD, true, None);
        assert!(!ctx.has_transparency());
        assert_eq!(ctx.weights, ChannelWeights::REC601);
        assert_eq!(ctx.histogram_keys(), BinKeyMode::Rgb565);
        assert_eq!(ctx.lookup_keys(), BinKeyMode::Rgb565);
    }

    #[test]
    fn test_small_palette_uses_1555_histogram() {
        let pixels = vec![Argb::rgb(1, 2, 3); 4];
        let source = PixelSource::new(&pixels, 2, 2).unwrap();
        let ctx = QuantContext::new(&source, 16, DEFAULT_ALPHA_THRESHOLD, true, None);
        assert_eq!(ctx.histogram_keys(), BinKeyMode::Argb1555);
        assert_eq!(ctx.lookup_keys(), BinKeyMode::Rgb565);
    }

    #[test]
    fn test_canonicalize_transparent() {
        let pixels = [Argb::rgb(1, 2, 3), Argb::new(3, 40, 50, 60)];
        let source = PixelSource::new(&pixels, 2, 1).unwrap();
        let ctx = QuantContext::new(&source, 8, DEFAULT_ALPHA_THRESHOLD, true, None);
        assert_eq!(ctx.transparent.map(|t| t.index), Some(1));
        assert_eq!(ctx.canonicalize(pixels[1]), Argb::TRANSPARENT);
        assert_eq!(ctx.canonicalize(pixels[0]), pixels[0]);
        assert!(ctx.is_transparent(pixels[1]));
    }

    #[test]
    fn test_weight_override() {
        let pixels = [Argb::rgb(1, 2, 3)];
        let source = PixelSource::new(&pixels, 1, 1).unwrap();
        let ctx = QuantContext::new(
            &source,
            8,
            DEFAULT_ALPHA_THRESHOLD,
            true,
            Some(ChannelWeights::REC709),
        );
        assert_eq!(ctx.weights, ChannelWeights::REC709);
    }
}
