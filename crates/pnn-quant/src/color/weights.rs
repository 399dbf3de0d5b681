//! Per-channel distance weights
//!
//! Both the merge cost of the clustering pass and the palette lookup use
//! weighted squared channel differences. The weights decide how much a
//! difference in each channel matters.

use super::Argb;

/// Weights applied to squared channel differences.
///
/// # Example
///
/// ```
/// use pnn_quant::{Argb, ChannelWeights};
///
/// let w = ChannelWeights::UNIFORM;
/// let d = w.distance(Argb::rgb(0, 0, 0), Argb::rgb(3, 4, 0), false);
/// assert_eq!(d, 25.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    /// Alpha weight
    pub alpha: f64,
    /// Red weight
    pub red: f64,
    /// Green weight
    pub green: f64,
    /// Blue weight
    pub blue: f64,
}

impl ChannelWeights {
    /// All channels equal. Used for small palettes where every entry counts.
    pub const UNIFORM: Self = Self {
        alpha: 1.0,
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    /// ITU-R BT.601 luma coefficients.
    pub const REC601: Self = Self {
        alpha: 1.0 / 3.0,
        red: 0.299,
        green: 0.587,
        blue: 0.114,
    };

    /// ITU-R BT.709 luma coefficients.
    pub const REC709: Self = Self {
        alpha: 1.0 / 3.0,
        red: 0.2126,
        green: 0.7152,
        blue: 0.0722,
    };

    /// Choose the preset for a quantization call.
    ///
    /// Palettes of 32 colors or fewer use [`UNIFORM`](Self::UNIFORM);
    /// otherwise images smaller than 512 in either dimension use
    /// [`REC601`](Self::REC601) and larger ones [`REC709`](Self::REC709).
    pub fn for_image(max_colors: usize, width: usize, height: usize) -> Self {
        if max_colors <= 32 {
            Self::UNIFORM
        } else if width < 512 || height < 512 {
            Self::REC601
        } else {
            Self::REC709
        }
    }

    /// Shift weight from green to blue when the palette is much smaller
    /// than the histogram.
    ///
    /// `ratio` is target colors divided by histogram bins. Below 0.025 the
    /// green weight drops (and blue rises) by `3 * (0.025 + ratio)`, which
    /// keeps blue gradients from collapsing in heavily reduced palettes.
    pub fn rebalanced(self, ratio: f64) -> Self {
        if ratio < 0.025 && self.green < 1.0 {
            let delta = 3.0 * (0.025 + ratio);
            Self {
                green: self.green - delta,
                blue: self.blue + delta,
                ..self
            }
        } else {
            self
        }
    }

    /// Weighted squared distance between two colors.
    ///
    /// The alpha term is included only when `with_alpha` is set.
    #[inline]
    pub fn distance(&self, a: Argb, b: Argb, with_alpha: bool) -> f64 {
        let mut d = self.red * sqr(a.r as f64 - b.r as f64)
            + self.green * sqr(a.g as f64 - b.g as f64)
            + self.blue * sqr(a.b as f64 - b.b as f64);
        if with_alpha {
            d += self.alpha * sqr(a.a as f64 - b.a as f64);
        }
        d
    }
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self::REC709
    }
}

#[inline]
pub(crate) fn sqr(v: f64) -> f64 {
    v * v
}
