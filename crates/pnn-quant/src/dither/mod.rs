//! Index resolution passes: error diffusion and blue-noise modulation.
//!
//! Two pipelines turn a palette and a pixel buffer into indices:
//!
//! - **Error diffusion** ([`ErrorDiffuser`]): pixels are visited along a
//!   [`GilbertCurve`], and each resolved pixel pushes its quantization error
//!   into a short weighted queue that biases the pixels visited next.
//!   Following a space-filling curve instead of rows keeps the error local
//!   in both directions.
//! - **Raster + blue noise** ([`resolve_raster`], [`BlueNoiseModulator`]):
//!   every pixel is resolved independently in row order, then each decision
//!   is re-taken with the source color nudged away from its chosen entry by
//!   a tiled noise texture.
//!
//! Both share [`IndexLookup`], which memoizes small-palette lookups by the
//! 16-bit bin key of the color being resolved.

mod blue_noise;
mod blue_noise_matrix;
mod diffusion;
mod gilbert;

pub use blue_noise::{BlueNoiseModulator, BLUE_NOISE_STRENGTH};
pub use diffusion::{ErrorBox, ErrorDiffuser, BLOCK_SIZE, DITHER_MAX};
pub use gilbert::GilbertCurve;

use crate::color::{Argb, BinKeyMode, KEY_SPACE};
use crate::palette::{ColorIndexResolver, MatchMode};
use crate::source::PixelSource;

/// Palettes smaller than this get a bin-key lookup cache.
pub const LOOKUP_CACHE_LIMIT: usize = 64;

/// Bin-key cache in front of a [`ColorIndexResolver`].
///
/// Only enabled for palettes with fewer than [`LOOKUP_CACHE_LIMIT`]
/// entries; larger palettes go straight to the resolver's exact-color memo.
#[derive(Debug)]
pub struct IndexLookup {
    keys: BinKeyMode,
    cache: Option<Vec<Option<u16>>>,
}

impl IndexLookup {
    /// Lookup for a palette of `palette_len` entries keyed by `keys`.
    pub fn new(keys: BinKeyMode, palette_len: usize) -> Self {
        let cache = (palette_len < LOOKUP_CACHE_LIMIT).then(|| vec![None; KEY_SPACE]);
        Self { keys, cache }
    }

    /// Resolve `color`, consulting the key cache first.
    pub fn resolve(
        &mut self,
        color: Argb,
        resolver: &mut ColorIndexResolver<'_>,
        mode: MatchMode,
        pos: usize,
    ) -> u16 {
        match &mut self.cache {
            Some(cache) => {
                let slot = &mut cache[self.keys.key(color)];
                *slot.get_or_insert_with(|| resolver.resolve(color, mode, pos))
            }
            None => resolver.resolve(color, mode, pos),
        }
    }
}

/// Resolve every pixel independently in row-major order.
///
/// `pos = x + y` drives the alternation of [`MatchMode::Closest`].
pub fn resolve_raster(
    source: &PixelSource<'_>,
    resolver: &mut ColorIndexResolver<'_>,
    mode: MatchMode,
) -> Vec<u16> {
    let width = source.width();
    source
        .pixels()
        .iter()
        .enumerate()
        .map(|(i, &pixel)| {
            let (x, y) = (i % width, i / width);
            resolver.resolve(pixel, mode, x + y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ChannelWeights;
    use crate::context::{QuantContext, DEFAULT_ALPHA_THRESHOLD};
    use crate::palette::Palette;

    #[test]
    fn test_lookup_cache_only_for_small_palettes() {
        assert!(IndexLookup::new(BinKeyMode::Rgb565, 63).cache.is_some());
        assert!(IndexLookup::new(BinKeyMode::Rgb565, 64).cache.is_none());
    }

    #[test]
    fn test_lookup_reuses_key_cell() {
        let pixels = [Argb::BLACK];
        let source = PixelSource::new(&pixels, 1, 1).unwrap();
        let ctx = QuantContext::new(&source, 2, DEFAULT_ALPHA_THRESHOLD, true, Some(ChannelWeights::UNIFORM));
        let palette = Palette::new(vec![Argb::rgb(0, 0, 0), Argb::rgb(6, 0, 0)]).unwrap();
        let mut resolver = ColorIndexResolver::new(&palette, &ctx);
        let mut lookup = IndexLookup::new(BinKeyMode::Rgb565, palette.len());

        // 2 and 7 share a 5-bit red cell; the first answer sticks.
        assert_eq!(lookup.resolve(Argb::rgb(2, 0, 0), &mut resolver, MatchMode::Nearest, 0), 0);
        assert_eq!(lookup.resolve(Argb::rgb(7, 0, 0), &mut resolver, MatchMode::Nearest, 0), 0);
        assert_eq!(resolver.nearest(Argb::rgb(7, 0, 0)), 1);
    }

    #[test]
    fn test_raster_resolve() {
        let pixels = [Argb::BLACK, Argb::WHITE, Argb::rgb(240, 240, 240), Argb::rgb(20, 0, 0)];
        let source = PixelSource::new(&pixels, 2, 2).unwrap();
        let ctx = QuantContext::new(&source, 2, DEFAULT_ALPHA_THRESHOLD, true, None);
        let palette = Palette::new(vec![Argb::BLACK, Argb::WHITE]).unwrap();
        let mut resolver = ColorIndexResolver::new(&palette, &ctx);
        assert_eq!(resolve_raster(&source, &mut resolver, MatchMode::Nearest), vec![0, 1, 1, 0]);
    }
}
