//! Palette construction.
//!
//! [`Quantizer`] is the seam between "given pixels and a target size,
//! produce a palette" and the index resolution that follows.
//! [`PnnQuantizer`] implements it with a histogram followed by pairwise
//! nearest neighbor clustering.

mod heap;
mod histogram;
mod pnn;
mod quantizer;

pub use heap::{MergeCandidate, MergeHeap};
pub use histogram::{Bin, BinState, Histogram};
pub use pnn::{merge_cost, reduce, ClusterReducer, CountScale, MergeStep};
pub use quantizer::{PnnQuantizer, Quantizer};
