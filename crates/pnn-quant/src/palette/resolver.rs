//! Color-to-palette-index resolution.
//!
//! Two strategies share one memo per distinct source color:
//!
//! - [`MatchMode::Nearest`]: the entry with the smallest weighted squared
//!   distance, alpha term included.
//! - [`MatchMode::Closest`]: tracks the best and second-best entries and
//!   alternates between them on a checkerboard of `pos` parity when the two
//!   are nearly equidistant. Large opaque palettes use this to break up
//!   banding without an error queue.

use std::collections::HashMap;

use super::Palette;
use crate::color::{sqr, Argb, ChannelWeights};
use crate::context::QuantContext;

/// Alternation threshold of [`MatchMode::Closest`].
///
/// The best entry is taken outright when `ALTERNATION_RATIO * d2 < d2 - d1`,
/// that is when it is clearly closer than the runner-up.
pub const ALTERNATION_RATIO: f64 = 0.67;

/// Which lookup strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Single nearest entry.
    Nearest,
    /// Best or second-best entry by position parity.
    Closest,
}

#[derive(Debug, Clone, Copy)]
struct Ranked {
    best: u16,
    second: u16,
    best_dist: f64,
    second_dist: f64,
}

/// Memoized palette lookup for one image.
///
/// Transparent source pixels short-circuit to the palette's transparent
/// slot when the image designated a transparent color.
#[derive(Debug)]
pub struct ColorIndexResolver<'p> {
    palette: &'p Palette,
    weights: ChannelWeights,
    semi_transparent: bool,
    alpha_threshold: u8,
    transparent_slot: Option<u16>,
    nearest_memo: HashMap<u32, u16>,
    closest_memo: HashMap<u32, Ranked>,
}

impl<'p> ColorIndexResolver<'p> {
    /// Resolver over `palette` using the weights and alpha facts of `ctx`.
    ///
    /// `palette` must not be empty.
    pub fn new(palette: &'p Palette, ctx: &QuantContext) -> Self {
        debug_assert!(!palette.is_empty());
        let transparent_slot = if ctx.has_transparency() {
            palette.transparent_slot()
        } else {
            None
        };
        Self {
            palette,
            weights: ctx.weights,
            semi_transparent: ctx.has_semi_transparency,
            alpha_threshold: ctx.alpha_threshold,
            transparent_slot,
            nearest_memo: HashMap::new(),
            closest_memo: HashMap::new(),
        }
    }

    /// The palette being resolved against.
    #[inline]
    pub fn palette(&self) -> &'p Palette {
        self.palette
    }

    /// Slot for `color` if it is a designated-transparent pixel and the
    /// palette has a transparent entry.
    #[inline]
    pub fn transparent_index(&self, color: Argb) -> Option<u16> {
        self.transparent_slot
            .filter(|_| color.a <= self.alpha_threshold)
    }

    /// Resolve `color` with the given strategy. `pos` only matters for
    /// [`MatchMode::Closest`].
    #[inline]
    pub fn resolve(&mut self, color: Argb, mode: MatchMode, pos: usize) -> u16 {
        match mode {
            MatchMode::Nearest => self.nearest(color),
            MatchMode::Closest => self.closest(color, pos),
        }
    }

    /// Index of the entry nearest to `color`. Ties keep the lower index.
    pub fn nearest(&mut self, color: Argb) -> u16 {
        if let Some(slot) = self.transparent_index(color) {
            return slot;
        }
        let key = color.to_u32();
        if let Some(&k) = self.nearest_memo.get(&key) {
            return k;
        }

        let w = &self.weights;
        let mut k = 0u16;
        let mut mindist = f64::INFINITY;
        for (i, c2) in self.palette.entries().iter().enumerate() {
            let mut curdist = w.alpha * sqr(c2.a as f64 - color.a as f64);
            if curdist >= mindist {
                continue;
            }
            curdist += w.red * sqr(c2.r as f64 - color.r as f64);
            if curdist >= mindist {
                continue;
            }
            curdist += w.green * sqr(c2.g as f64 - color.g as f64);
            if curdist >= mindist {
                continue;
            }
            curdist += w.blue * sqr(c2.b as f64 - color.b as f64);
            if curdist >= mindist {
                continue;
            }
            mindist = curdist;
            k = i as u16;
        }

        self.nearest_memo.insert(key, k);
        k
    }

    /// Best or second-best entry for `color`, alternating by `pos` parity
    /// when the two are close.
    ///
    /// Falls back to [`nearest`](Self::nearest) when the chosen distance is
    /// at least the palette length.
    pub fn closest(&mut self, color: Argb, pos: usize) -> u16 {
        if let Some(slot) = self.transparent_index(color) {
            return slot;
        }
        let key = color.to_u32();
        let ranked = match self.closest_memo.get(&key) {
            Some(&r) => r,
            None => {
                let r = self.rank(color);
                self.closest_memo.insert(key, r);
                r
            }
        };

        let mut idx = (pos + 1) % 2;
        if ALTERNATION_RATIO * ranked.second_dist < ranked.second_dist - ranked.best_dist {
            idx = 0;
        } else if ranked.best > ranked.second {
            idx = pos % 2;
        }

        let (index, dist) = if idx == 0 {
            (ranked.best, ranked.best_dist)
        } else {
            (ranked.second, ranked.second_dist)
        };
        if dist >= self.palette.len() as f64 {
            return self.nearest(color);
        }
        index
    }

    fn rank(&self, color: Argb) -> Ranked {
        let mut r = Ranked {
            best: 0,
            second: 0,
            best_dist: f64::MAX,
            second_dist: f64::MAX,
        };
        for (i, &c2) in self.palette.entries().iter().enumerate() {
            let err = self.weights.distance(color, c2, self.semi_transparent);
            if err < r.best_dist {
                r.second = r.best;
                r.second_dist = r.best_dist;
                r.best = i as u16;
                r.best_dist = err;
            } else if err < r.second_dist {
                r.second = i as u16;
                r.second_dist = err;
            }
        }
        if r.second_dist == f64::MAX {
            r.second = r.best;
        }
        r
    }
}
