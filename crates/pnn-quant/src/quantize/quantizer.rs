//! The palette-producing stage of the pipeline.

use super::histogram::Histogram;
use super::pnn::{reduce, CountScale};
use crate::context::QuantContext;
use crate::palette::{finalize, Palette};
use crate::source::PixelSource;

/// Anything that can derive a palette for an image.
///
/// Implementations may adjust `ctx.weights`; the adjusted weights are the
/// ones index resolution uses afterwards.
pub trait Quantizer {
    /// Build a palette of at most `ctx.max_colors` entries for `source`.
    ///
    /// An empty image yields an empty palette.
    fn build_palette(&self, source: &PixelSource<'_>, ctx: &mut QuantContext) -> Palette;
}

/// Histogram + pairwise nearest neighbor clustering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnnQuantizer;

impl Quantizer for PnnQuantizer {
    fn build_palette(&self, source: &PixelSource<'_>, ctx: &mut QuantContext) -> Palette {
        let histogram = Histogram::build(source, ctx);
        if histogram.is_empty() {
            return Palette::empty();
        }

        let target = ctx.max_colors;
        let ratio = target as f64 / histogram.len() as f64;
        ctx.weights = ctx.weights.rebalanced(ratio);
        let scale = CountScale::select(target, ratio);
        let pinned = if target >= 2 {
            histogram.transparent_bin()
        } else {
            None
        };

        let bins = reduce(
            histogram.into_bins(),
            target,
            scale,
            &ctx.weights,
            ctx.has_semi_transparency,
            pinned,
        );
        let palette = finalize(&bins, ctx);

        if palette.len() < target {
            tracing::debug!(
                requested = target,
                achieved = palette.len(),
                "Image has fewer distinct colors than requested"
            );
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Argb, ChannelWeights};
    use crate::context::DEFAULT_ALPHA_THRESHOLD;

    fn palette_of(pixels: &[Argb], w: usize, h: usize, target: usize) -> (Palette, QuantContext) {
        let source = PixelSource::new(pixels, w, h).unwrap();
        let mut ctx = QuantContext::new(&source, target, DEFAULT_ALPHA_THRESHOLD, true, None);
        let palette = PnnQuantizer.build_palette(&source, &mut ctx);
        (palette, ctx)
    }

    #[test]
    fn test_empty_image_gives_empty_palette() {
        let (palette, _) = palette_of(&[], 0, 0, 16);
        assert!(palette.is_empty());
    }

    #[test]
    fn test_fewer_colors_than_target() {
        let pixels = [Argb::rgb(255, 0, 0), Argb::rgb(0, 0, 255)];
        let (palette, _) = palette_of(&pixels, 2, 1, 256);
        assert_eq!(palette.len(), 2);
        assert!(palette.entries().contains(&Argb::rgb(255, 0, 0)));
        assert!(palette.entries().contains(&Argb::rgb(0, 0, 255)));
    }

    #[test]
    fn test_reduces_to_target() {
        let pixels: Vec<Argb> = (0..64u32)
            .map(|i| Argb::rgb((i * 4) as u8, 255 - (i * 4) as u8, (i % 8 * 32) as u8))
            .collect();
        let (palette, _) = palette_of(&pixels, 8, 8, 8);
        assert_eq!(palette.len(), 8);
    }

    #[test]
    fn test_transparent_entry_survives_small_target() {
        let mut pixels = vec![Argb::rgb(250, 250, 250); 30];
        pixels.push(Argb::new(0, 0, 0, 0));
        pixels.push(Argb::rgb(0, 0, 0));
        let (palette, _) = palette_of(&pixels, 8, 4, 2);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some(Argb::TRANSPARENT));
    }

    #[test]
    fn test_weights_rebalanced_in_context() {
        // 100 distinct bins for 2 colors: ratio 0.02 shifts green to blue,
        // but the 2-color preset is uniform and stays untouched.
        let pixels: Vec<Argb> = (0..100u32)
            .map(|i| Argb::rgb((i % 10 * 25) as u8, (i / 10 * 25) as u8, 0))
            .collect();
        let (_, ctx) = palette_of(&pixels, 10, 10, 2);
        assert_eq!(ctx.weights, ChannelWeights::UNIFORM);

        let source = PixelSource::new(&pixels, 10, 10).unwrap();
        let mut ctx = QuantContext::new(&source, 2, DEFAULT_ALPHA_THRESHOLD, true, Some(ChannelWeights::REC601));
        PnnQuantizer.build_palette(&source, &mut ctx);
        assert!(ctx.weights.green < ChannelWeights::REC601.green);
        assert!(ctx.weights.blue > ChannelWeights::REC601.blue);
    }
}
