//! Pairwise nearest neighbor clustering.
//!
//! The compacted histogram bins form a doubly-linked chain. Each bin caches
//! the cheapest merge with any bin further along the chain; a lazy min-heap
//! orders bins by that cost. The reducer repeatedly takes the cheapest valid
//! merge, folds the neighbor into the bin and unlinks it, until only the
//! target number of bins remain.
//!
//! The merge cost of bins `i` and `j` is the weighted squared distance of
//! their means scaled by `n_i * n_j / (n_i + n_j)`. That factor is what makes
//! this PNN: small clusters merge early, large well-supported ones late.
//!
//! Cached costs go stale when a merge changes a bin or its neighbor. Each bin
//! records when its cost was computed (`tm`) and when it last absorbed
//! another bin (`mtm`). A popped entry is trusted only if neither the bin nor
//! its neighbor changed since `tm`; otherwise the cost is recomputed and the
//! bin re-queued.

use super::heap::{MergeCandidate, MergeHeap};
use super::histogram::{Bin, BinState};
use crate::color::{sqr, ChannelWeights};

/// Monotonic remapping of bin populations applied before clustering.
///
/// Very frequent colors (flat backgrounds, near-black shadows) would
/// otherwise dominate every merge decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountScale {
    /// Counts used as-is.
    Identity,
    /// Square root, or power 0.75 for the first (darkest-keyed) bin.
    /// Floored when `floor` is set.
    Sqrt {
        /// Round results down to whole numbers.
        floor: bool,
    },
    /// Floored cube root.
    CubeRoot,
}

impl CountScale {
    /// Pick the remapping for a target palette size.
    ///
    /// `ratio` is target colors divided by histogram bins.
    pub fn select(max_colors: usize, ratio: f64) -> Self {
        let mut rt = 1;
        if max_colors < 16 {
            rt = -1;
        }
        if ratio > 0.003 && ratio < 0.005 {
            rt = 0;
        }
        match rt {
            1 => CountScale::Sqrt {
                floor: max_colors < 64,
            },
            -1 => CountScale::CubeRoot,
            _ => CountScale::Identity,
        }
    }

    /// Remap one count. `is_black` marks the first bin of the chain.
    pub fn apply(self, count: f64, is_black: bool) -> f64 {
        match self {
            CountScale::Identity => count,
            CountScale::Sqrt { floor } => {
                let v = if is_black { count.powf(0.75) } else { count.sqrt() };
                if floor {
                    v.floor()
                } else {
                    v
                }
            }
            CountScale::CubeRoot => count.cbrt().floor(),
        }
    }
}

/// Cost of merging two bins.
///
/// Always non-negative; zero for bins with identical means.
pub fn merge_cost(a: &Bin, b: &Bin, weights: &ChannelWeights, with_alpha: bool) -> f64 {
    let mut err = weights.red * sqr(b.r - a.r)
        + weights.green * sqr(b.g - a.g)
        + weights.blue * sqr(b.b - a.b);
    if with_alpha {
        err += weights.alpha * sqr(b.a - a.a);
    }
    err * (a.count * b.count) / (a.count + b.count)
}

/// One merge performed by the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStep {
    /// Surviving bin.
    pub into: usize,
    /// Absorbed bin.
    pub from: usize,
    /// Cached cost the merge was chosen at.
    pub cost: f64,
}

/// Clustering state over a bin arena.
///
/// Bins are addressed by their index in the arena for the whole run;
/// absorbed bins stay in place, tagged [`BinState::Merged`].
#[derive(Debug)]
pub struct ClusterReducer<'w> {
    bins: Vec<Bin>,
    heap: MergeHeap,
    weights: &'w ChannelWeights,
    with_alpha: bool,
    merges: u32,
    active: usize,
}

impl<'w> ClusterReducer<'w> {
    /// Link `bins` into a chain, rescale their counts and queue every bin
    /// with its nearest forward neighbor.
    ///
    /// `pinned` marks a bin that must survive unmerged.
    pub fn new(
        mut bins: Vec<Bin>,
        scale: CountScale,
        weights: &'w ChannelWeights,
        with_alpha: bool,
        pinned: Option<usize>,
    ) -> Self {
        let n = bins.len();
        for (j, bin) in bins.iter_mut().enumerate() {
            bin.prev = j.checked_sub(1);
            bin.next = (j + 1 < n).then_some(j + 1);
            bin.count = scale.apply(bin.count, j == 0);
            bin.state = BinState::Active;
            bin.pinned = pinned == Some(j);
            bin.tm = 0;
            bin.mtm = 0;
        }

        let mut reducer = Self {
            bins,
            heap: MergeHeap::with_capacity(n + 1),
            weights,
            with_alpha,
            merges: 0,
            active: n,
        };
        for i in 0..n {
            reducer.find_nn(i);
            reducer.heap.push(i, reducer.bins[i].err);
        }
        reducer
    }

    /// Number of bins still in the chain.
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Merge until at most `target` bins remain or nothing can merge.
    pub fn reduce_to(&mut self, target: usize) -> Vec<MergeStep> {
        let mut steps = Vec::with_capacity(self.active.saturating_sub(target));
        while self.active > target {
            match self.merge_next() {
                Some(step) => steps.push(step),
                None => break,
            }
        }
        steps
    }

    /// Perform the cheapest valid merge, if any.
    pub fn merge_next(&mut self) -> Option<MergeStep> {
        let candidate = self.next_candidate()?;
        let b1 = candidate.bin;
        let nb = self.bins[b1].nn?;

        let (n1, n2) = (self.bins[b1].count, self.bins[nb].count);
        let d = 1.0 / (n1 + n2);
        let other = self.bins[nb].clone();
        let tb = &mut self.bins[b1];
        tb.a = d * (n1 * tb.a + n2 * other.a).round();
        tb.r = d * (n1 * tb.r + n2 * other.r).round();
        tb.g = d * (n1 * tb.g + n2 * other.g).round();
        tb.b = d * (n1 * tb.b + n2 * other.b).round();
        tb.count += other.count;
        self.merges += 1;
        tb.mtm = self.merges;

        self.unlink(nb);
        self.active -= 1;

        // Still holds the pre-merge cost; refreshed when it next surfaces.
        self.heap.push(b1, self.bins[b1].err);
        tracing::trace!(into = b1, from = nb, cost = candidate.err, "Merged bins");

        Some(MergeStep {
            into: b1,
            from: nb,
            cost: candidate.err,
        })
    }

    /// Surviving bins in chain order.
    pub fn into_survivors(self) -> Vec<Bin> {
        let mut out = Vec::with_capacity(self.active);
        let mut cursor = (!self.bins.is_empty()).then_some(0);
        while let Some(i) = cursor {
            out.push(self.bins[i].clone());
            cursor = self.bins[i].next;
        }
        out
    }

    /// Pop heap entries until one is current, refreshing stale ones.
    fn next_candidate(&mut self) -> Option<MergeCandidate> {
        loop {
            let candidate = self.heap.pop()?;
            let b = candidate.bin;
            let bin = &self.bins[b];
            if bin.state == BinState::Merged {
                continue;
            }

            let neighbor_current = bin.nn.map_or(true, |nn| {
                let n = &self.bins[nn];
                n.state == BinState::Active && n.mtm <= bin.tm
            });
            if bin.tm >= bin.mtm && neighbor_current {
                // A current entry without a neighbor means nothing can merge.
                return bin.nn.map(|_| candidate);
            }

            self.find_nn(b);
            self.bins[b].tm = self.merges;
            self.heap.push(b, self.bins[b].err);
        }
    }

    /// Recompute the cheapest forward merge for bin `idx`.
    fn find_nn(&mut self, idx: usize) {
        let mut err = f64::INFINITY;
        let mut nn = None;

        if !self.bins[idx].pinned {
            let bin1 = &self.bins[idx];
            let mut cursor = bin1.next;
            while let Some(i) = cursor {
                let other = &self.bins[i];
                cursor = other.next;
                if other.pinned {
                    continue;
                }
                let cost = merge_cost(bin1, other, self.weights, self.with_alpha);
                if cost < err {
                    err = cost;
                    nn = Some(i);
                }
            }
        }

        let bin1 = &mut self.bins[idx];
        bin1.err = err;
        bin1.nn = nn;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.bins[idx].prev, self.bins[idx].next);
        if let Some(p) = prev {
            self.bins[p].next = next;
        }
        if let Some(n) = next {
            self.bins[n].prev = prev;
        }
        let bin = &mut self.bins[idx];
        bin.state = BinState::Merged;
        bin.next = None;
        bin.prev = None;
    }
}

/// Cluster `bins` down to at most `target` survivors.
///
/// Returns the survivors in chain order. Fewer than `target` come back only
/// when the input had fewer bins to begin with.
pub fn reduce(
    bins: Vec<Bin>,
    target: usize,
    scale: CountScale,
    weights: &ChannelWeights,
    with_alpha: bool,
    pinned: Option<usize>,
) -> Vec<Bin> {
    let initial = bins.len();
    let mut reducer = ClusterReducer::new(bins, scale, weights, with_alpha, pinned);
    let steps = reducer.reduce_to(target);
    tracing::debug!(
        bins = initial,
        merges = steps.len(),
        survivors = reducer.active(),
        ?scale,
        "PNN reduction complete"
    );
    reducer.into_survivors()
}
