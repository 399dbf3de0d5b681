//! Min-heap of merge candidates with lazy invalidation.
//!
//! Entries are never removed or updated in place. When a bin's cached cost
//! goes stale, the old entry stays in the heap and is discarded or refreshed
//! only when it reaches the top. Validity is checked on pop, not on push.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A bin and the merge cost cached for it when it was pushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCandidate {
    /// Arena index of the bin.
    pub bin: usize,
    /// Cost of merging the bin with its nearest neighbor, as cached.
    pub err: f64,
}

impl Eq for MergeCandidate {}

impl Ord for MergeCandidate {
    /// Reversed so that `BinaryHeap` pops the cheapest merge first.
    /// Equal costs pop the lower bin index first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .err
            .total_cmp(&self.err)
            .then_with(|| other.bin.cmp(&self.bin))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of [`MergeCandidate`]s, cheapest first.
#[derive(Debug, Default)]
pub struct MergeHeap {
    heap: BinaryHeap<MergeCandidate>,
}

impl MergeHeap {
    /// Empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Queue `bin` with cached cost `err`.
    #[inline]
    pub fn push(&mut self, bin: usize, err: f64) {
        self.heap.push(MergeCandidate { bin, err });
    }

    /// Remove and return the cheapest entry, stale or not.
    #[inline]
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        self.heap.pop()
    }

    /// Cheapest entry without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&MergeCandidate> {
        self.heap.peek()
    }

    /// Number of queued entries, including stale ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_cheapest_first() {
        let mut heap = MergeHeap::with_capacity(4);
        heap.push(0, 5.0);
        heap.push(1, 1.0);
        heap.push(2, f64::INFINITY);
        heap.push(3, 3.0);

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop()).map(|c| c.bin).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_ties_break_on_bin_index() {
        let mut heap = MergeHeap::default();
        heap.push(7, 2.0);
        heap.push(2, 2.0);
        heap.push(5, 2.0);
        assert_eq!(heap.peek().map(|c| c.bin), Some(2));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut heap = MergeHeap::default();
        heap.push(1, 4.0);
        heap.push(1, 2.0);
        assert_eq!(heap.pop(), Some(MergeCandidate { bin: 1, err: 2.0 }));
        assert_eq!(heap.pop(), Some(MergeCandidate { bin: 1, err: 4.0 }));
        assert!(heap.is_empty());
    }
}
