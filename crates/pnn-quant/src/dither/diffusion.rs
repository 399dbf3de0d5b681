//! Error diffusion along a Gilbert curve.
//!
//! Unlike kernel-based diffusion (Floyd-Steinberg and friends), the error
//! here is not spread over a fixed 2D neighborhood. The ditherer remembers
//! the residuals of the last [`DITHER_MAX`] pixels it visited and adds
//! their weighted sum to the next pixel. Because the visiting order is a
//! space-filling curve, "recent" means "nearby" in both directions.
//!
//! The weights decay geometrically from newest to oldest so that the
//! newest residual weighs `BLOCK_SIZE + 1` times the oldest.

use std::collections::VecDeque;

use super::{GilbertCurve, IndexLookup};
use crate::color::{Argb, BinKeyMode};
use crate::palette::{ColorIndexResolver, MatchMode};
use crate::source::PixelSource;

/// Length of the residual queue.
pub const DITHER_MAX: usize = 9;

/// Ratio between the newest and oldest weight, minus one.
pub const BLOCK_SIZE: usize = 343;

/// Residual components above this magnitude are damped for large palettes.
const ERROR_DAMP_LIMIT: f32 = DITHER_MAX as f32;

/// Palettes above this size get residual damping.
const ERROR_DAMP_PALETTE: usize = 16;

/// Quantization residual in alpha, red, green, blue order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorBox(pub [f32; 4]);

impl ErrorBox {
    /// `corrected - chosen`, channel by channel.
    #[inline]
    pub fn between(corrected: Argb, chosen: Argb) -> Self {
        let c = corrected.channels();
        let p = chosen.channels();
        Self([c[0] - p[0], c[1] - p[1], c[2] - p[2], c[3] - p[3]])
    }

    /// Divide every component of magnitude at least `limit` by 3.
    #[inline]
    fn damp(&mut self, limit: f32) {
        for e in &mut self.0 {
            if e.abs() >= limit {
                *e /= 3.0;
            }
        }
    }
}

/// Gilbert-curve error diffuser.
///
/// # Example
///
/// ```
/// use pnn_quant::ErrorDiffuser;
///
/// let diffuser = ErrorDiffuser::new();
/// let sum: f32 = diffuser.weights().iter().sum();
/// assert!((sum - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorDiffuser {
    /// `weights[0]` applies to the oldest residual, `weights[DITHER_MAX - 1]`
    /// to the newest.
    weights: [f32; DITHER_MAX],
}

impl Default for ErrorDiffuser {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorDiffuser {
    /// Diffuser with the standard geometric weights.
    pub fn new() -> Self {
        let ratio = ((BLOCK_SIZE + 1) as f32).powf(1.0 / (DITHER_MAX - 1) as f32);
        let mut weights = [0f32; DITHER_MAX];
        let mut weight = 1f32;
        let mut sum = 0f32;
        for c in 0..DITHER_MAX {
            weights[DITHER_MAX - 1 - c] = weight;
            sum += weight;
            weight /= ratio;
        }

        let mut normalized = 0f32;
        for w in &mut weights {
            *w /= sum;
            normalized += *w;
        }
        weights[DITHER_MAX - 1] += 1.0 - normalized;

        Self { weights }
    }

    /// Queue weights, oldest first.
    #[inline]
    pub fn weights(&self) -> &[f32; DITHER_MAX] {
        &self.weights
    }

    /// Resolve every pixel of `source` along the curve, returning row-major
    /// indices.
    ///
    /// `keys` selects the bin key of the small-palette lookup cache.
    pub fn dither(
        &self,
        source: &PixelSource<'_>,
        resolver: &mut ColorIndexResolver<'_>,
        keys: BinKeyMode,
    ) -> Vec<u16> {
        let palette = resolver.palette();
        let damp = palette.len() > ERROR_DAMP_PALETTE;
        let width = source.width();
        let mut indices = vec![0u16; source.len()];
        let mut lookup = IndexLookup::new(keys, palette.len());
        let mut queue: VecDeque<ErrorBox> = std::iter::repeat(ErrorBox::default()).take(DITHER_MAX).collect();

        GilbertCurve::new(width, source.height()).for_each(|x, y| {
            let pixel = source.get(x, y);

            let (index, residual) = match resolver.transparent_index(pixel) {
                Some(slot) => (slot, ErrorBox::default()),
                None => {
                    let mut err = [0f32; 4];
                    for (w, e) in self.weights.iter().zip(queue.iter()) {
                        for (acc, v) in err.iter_mut().zip(e.0) {
                            *acc += w * v;
                        }
                    }
                    let p = pixel.channels();
                    let corrected = Argb::from_clamped(p[0] + err[0], p[1] + err[1], p[2] + err[2], p[3] + err[3]);

                    let index = lookup.resolve(corrected, resolver, MatchMode::Nearest, x + y);
                    let mut residual = ErrorBox::between(corrected, palette[index]);
                    if damp {
                        residual.damp(ERROR_DAMP_LIMIT);
                    }
                    (index, residual)
                }
            };

            queue.pop_front();
            queue.push_back(residual);
            indices[y * width + x] = index;
        });

        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ChannelWeights;
    use crate::context::{QuantContext, DEFAULT_ALPHA_THRESHOLD};
    use crate::palette::Palette;

    fn run(pixels: &[Argb], w: usize, h: usize, palette: &Palette) -> Vec<u16> {
        let source = PixelSource::new(pixels, w, h).unwrap();
        let ctx = QuantContext::new(&source, palette.len(), DEFAULT_ALPHA_THRESHOLD, true, Some(ChannelWeights::UNIFORM));
        let mut resolver = ColorIndexResolver::new(palette, &ctx);
        ErrorDiffuser::new().dither(&source, &mut resolver, ctx.lookup_keys())
    }

    #[test]
    fn test_weights_decay_and_normalize() {
        let d = ErrorDiffuser::new();
        let w = d.weights();
        for pair in w.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let ratio = w[DITHER_MAX - 1] / w[0];
        assert!((ratio - (BLOCK_SIZE + 1) as f32).abs() < 1.0, "ratio {ratio}");
        let sum: f32 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_exact_palette_colors_pass_through() {
        let palette = Palette::new(vec![Argb::BLACK, Argb::WHITE]).unwrap();
        let pixels = [Argb::BLACK, Argb::WHITE, Argb::WHITE, Argb::BLACK];
        assert_eq!(run(&pixels, 2, 2, &palette), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_mid_gray_dithers_to_mix() {
        let palette = Palette::new(vec![Argb::BLACK, Argb::WHITE]).unwrap();
        let pixels = vec![Argb::rgb(128, 128, 128); 16 * 16];
        let indices = run(&pixels, 16, 16, &palette);
        let white = indices.iter().filter(|&&i| i == 1).count();
        assert!(white > 64 && white < 192, "white count {white}");
    }

    #[test]
    fn test_deterministic() {
        let palette = Palette::new(vec![Argb::BLACK, Argb::rgb(200, 30, 30), Argb::WHITE]).unwrap();
        let pixels: Vec<Argb> = (0..15 * 9u32)
            .map(|i| Argb::rgb((i * 7) as u8, (i * 3) as u8, (255 - i) as u8))
            .collect();
        let a = run(&pixels, 15, 9, &palette);
        let b = run(&pixels, 15, 9, &palette);
        assert_eq!(a, b);
        assert!(a.iter().all(|&i| (i as usize) < palette.len()));
    }

    #[test]
    fn test_transparent_pixels_take_slot_zero() {
        let palette = Palette::new(vec![Argb::TRANSPARENT, Argb::BLACK, Argb::WHITE]).unwrap();
        let pixels = [Argb::new(0, 0, 0, 0), Argb::WHITE, Argb::new(10, 255, 0, 0), Argb::BLACK];
        let indices = run(&pixels, 2, 2, &palette);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[2], 0);
        assert_eq!(indices[1], 2);
        assert_eq!(indices[3], 1);
    }

    #[test]
    fn test_damping() {
        let mut e = ErrorBox([-30.0, 8.0, 9.0, 0.0]);
        e.damp(ERROR_DAMP_LIMIT);
        assert_eq!(e, ErrorBox([-10.0, 8.0, 3.0, 0.0]));
    }
}
