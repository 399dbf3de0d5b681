//! Color histogram over 16-bit quantization cells.
//!
//! Every pixel is dropped into one of 65536 cells keyed by
//! [`BinKeyMode`](crate::color::BinKeyMode). Empty cells are then compacted
//! away and each survivor is turned into a [`Bin`] holding the mean color
//! of its pixels, ready for the clustering pass.

use crate::color::{Argb, KEY_SPACE};
use crate::context::QuantContext;
use crate::source::PixelSource;

/// Whether a bin is still part of the active chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinState {
    /// Live cluster.
    #[default]
    Active,
    /// Absorbed by another bin; never revisited.
    Merged,
}

/// One cluster of colors.
///
/// Besides the mean color and pixel count, a bin carries the bookkeeping
/// the clustering pass needs: chain links, its cached nearest neighbor and
/// merge cost, and the two stamps used to detect stale heap entries.
#[derive(Debug, Clone, Default)]
pub struct Bin {
    /// Mean alpha.
    pub a: f64,
    /// Mean red.
    pub r: f64,
    /// Mean green.
    pub g: f64,
    /// Mean blue.
    pub b: f64,
    /// Pixel count (remapped by the count scale before clustering).
    pub count: f64,
    /// Histogram key the bin was built from.
    pub key: usize,
    pub(crate) err: f64,
    pub(crate) nn: Option<usize>,
    pub(crate) next: Option<usize>,
    pub(crate) prev: Option<usize>,
    /// Merge count at which `nn`/`err` were last computed.
    pub(crate) tm: u32,
    /// Merge count at which this bin last absorbed another.
    pub(crate) mtm: u32,
    pub(crate) state: BinState,
    /// Never absorbed and never absorbing (the designated transparent color).
    pub(crate) pinned: bool,
}

impl Bin {
    /// A bin holding `count` pixels of exactly `color`.
    pub fn from_color(color: Argb, count: f64) -> Self {
        Self {
            a: color.a as f64,
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            count,
            ..Default::default()
        }
    }

    /// Whether the bin is still in the chain.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == BinState::Active
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    a: f64,
    r: f64,
    g: f64,
    b: f64,
    count: u64,
}

/// Compacted histogram of an image.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    bins: Vec<Bin>,
    transparent_bin: Option<usize>,
}

impl Histogram {
    /// Scan every pixel of `source` into bins.
    ///
    /// Low-alpha pixels are coerced to the canonical transparent color
    /// first, so they all share one bin. Bins come out in ascending key
    /// order; a zero-size image yields an empty histogram.
    pub fn build(source: &PixelSource<'_>, ctx: &QuantContext) -> Self {
        let keys = ctx.histogram_keys();
        let mut cells = vec![Cell::default(); KEY_SPACE];

        for &pixel in source.pixels() {
            let c = ctx.canonicalize(pixel);
            let cell = &mut cells[keys.key(c)];
            cell.a += c.a as f64;
            cell.r += c.r as f64;
            cell.g += c.g as f64;
            cell.b += c.b as f64;
            cell.count += 1;
        }

        let bins: Vec<Bin> = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.count > 0)
            .map(|(key, cell)| {
                let d = 1.0 / cell.count as f64;
                Bin {
                    a: cell.a * d,
                    r: cell.r * d,
                    g: cell.g * d,
                    b: cell.b * d,
                    count: cell.count as f64,
                    key,
                    ..Default::default()
                }
            })
            .collect();

        let transparent_bin = ctx.transparent.and_then(|t| {
            let key = keys.key(t.color);
            bins.iter().position(|bin| bin.key == key)
        });

        tracing::debug!(
            pixels = source.len(),
            bins = bins.len(),
            key_mode = ?keys,
            "Built color histogram"
        );

        Self {
            bins,
            transparent_bin,
        }
    }

    /// Non-empty bins in key order.
    #[inline]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Number of non-empty bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether no pixel was counted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Position of the bin holding the designated transparent color.
    #[inline]
    pub fn transparent_bin(&self) -> Option<usize> {
        self.transparent_bin
    }

    /// Consume the histogram, returning its bins.
    pub fn into_bins(self) -> Vec<Bin> {
        self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DEFAULT_ALPHA_THRESHOLD;

    fn build(pixels: &[Argb], w: usize, h: usize, max_colors: usize) -> Histogram {
        let source = PixelSource::new(pixels, w, h).unwrap();
        let ctx = QuantContext::new(&source, max_colors, DEFAULT_ALPHA_THRESHOLD, true, None);
        Histogram::build(&source, &ctx)
    }

    #[test]
    fn test_empty_image() {
        let hist = build(&[], 0, 0, 16);
        assert!(hist.is_empty());
        assert_eq!(hist.transparent_bin(), None);
    }

    #[test]
    fn test_counts_and_means() {
        let pixels = [
            Argb::rgb(255, 0, 0),
            Argb::rgb(255, 0, 0),
            Argb::rgb(0, 0, 255),
            Argb::rgb(0, 0, 255),
        ];
        let hist = build(&pixels, 2, 2, 2);
        assert_eq!(hist.len(), 2);
        let total: f64 = hist.bins().iter().map(|b| b.count).sum();
        assert_eq!(total, 4.0);
        for bin in hist.bins() {
            assert_eq!(bin.count, 2.0);
            assert!(bin.r == 255.0 || bin.b == 255.0);
        }
    }

    #[test]
    fn test_same_cell_averages() {
        // 200 and 202 share a 5-bit red cell
        let pixels = [Argb::rgb(200, 0, 0), Argb::rgb(202, 0, 0)];
        let hist = build(&pixels, 2, 1, 256);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.bins()[0].r, 201.0);
    }

    #[test]
    fn test_bins_sorted_by_key() {
        let pixels = [Argb::rgb(255, 255, 255), Argb::rgb(0, 0, 0), Argb::rgb(128, 0, 0)];
        let hist = build(&pixels, 3, 1, 256);
        let keys: Vec<usize> = hist.bins().iter().map(|b| b.key).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_transparent_pixels_share_one_bin() {
        let pixels = [
            Argb::new(0, 10, 20, 30),
            Argb::new(5, 200, 100, 0),
            Argb::rgb(0, 255, 0),
        ];
        let hist = build(&pixels, 3, 1, 16);
        assert_eq!(hist.len(), 2);
        let t = hist.transparent_bin().expect("transparent bin");
        let bin = &hist.bins()[t];
        assert_eq!(bin.count, 2.0);
        assert_eq!(bin.a, 0.0);
        assert_eq!((bin.r, bin.g, bin.b), (255.0, 255.0, 255.0));
    }
}
