//! Blue-noise modulation of raster index decisions.
//!
//! After a plain raster resolve, each pixel is pushed away from the entry it
//! was matched to by an amount read from a tiled 64x64 noise texture, and
//! then matched again. Pixels sitting between two entries flip in a
//! blue-noise pattern instead of snapping uniformly to one side.
//!
//! The texture is read twice per pixel: once directly and once through a
//! `(19x, 23y)` distortion that decorrelates the second sample. The second
//! sample is signed by the checkerboard parity of `x + y`.

use super::blue_noise_matrix::BLUE_NOISE_64;
use super::IndexLookup;
use crate::color::{Argb, BinKeyMode};
use crate::palette::{ColorIndexResolver, MatchMode};
use crate::source::PixelSource;

/// Amplitude of the distorted noise sample.
pub const BLUE_NOISE_STRENGTH: f32 = 1.0 / 3.0;

#[inline]
fn texel(x: usize, y: usize) -> f32 {
    BLUE_NOISE_64[(x & 63) | ((y & 63) << 6)] as f32
}

/// Blue-noise modulator.
///
/// # Example
///
/// ```
/// use pnn_quant::BlueNoiseModulator;
///
/// let noise = BlueNoiseModulator::new();
/// // The texture tiles every 64 pixels.
/// assert_eq!(noise.adjustment(3, 5), noise.adjustment(67, 133));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlueNoiseModulator {
    weight: f32,
}

impl Default for BlueNoiseModulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueNoiseModulator {
    /// Modulator at full weight.
    pub fn new() -> Self {
        Self { weight: 1.0 }
    }

    /// Scale the adjustment. 0 disables the pass.
    #[inline]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Current weight.
    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Signed adjustment factor at `(x, y)`.
    pub fn adjustment(&self, x: usize, y: usize) -> f32 {
        let parity = ((x + y) & 1) as f32 - 0.5;
        let distorted = 0.5 + texel(x.wrapping_mul(19), y.wrapping_mul(23));
        (texel(x, y) + 0.5) / 127.5 - parity * BLUE_NOISE_STRENGTH * distorted * 11.0 / 8192.0
    }

    /// Re-resolve every pixel of `source` in raster order with its color
    /// pushed away from the entry currently in `indices`.
    ///
    /// Designated-transparent pixels keep their index.
    pub fn apply(
        &self,
        source: &PixelSource<'_>,
        indices: &mut [u16],
        resolver: &mut ColorIndexResolver<'_>,
        mode: MatchMode,
        keys: BinKeyMode,
    ) {
        if self.weight == 0.0 {
            return;
        }
        let palette = resolver.palette();
        let width = source.width();
        let mut lookup = IndexLookup::new(keys, palette.len());

        for (i, &pixel) in source.pixels().iter().enumerate() {
            if resolver.transparent_index(pixel).is_some() {
                continue;
            }
            let (x, y) = (i % width, i / width);
            let c1 = palette[indices[i]].channels();
            let adj = self.adjustment(x, y) * self.weight;
            let p = pixel.channels();
            let moved = Argb::from_clamped(
                p[0] + adj * (p[0] - c1[0]),
                p[1] + adj * (p[1] - c1[1]),
                p[2] + adj * (p[2] - c1[2]),
                p[3] + adj * (p[3] - c1[3]),
            );
            indices[i] = lookup.resolve(moved, resolver, mode, x + y);
        }
    }
}
