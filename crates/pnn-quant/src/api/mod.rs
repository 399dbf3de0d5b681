//! Public API for the pnn-quant crate.
//!
//! This module provides the high-level API: the [`PnnQuant`] builder and
//! the [`QuantizeError`] error type.

mod builder;
mod error;

pub use builder::{PnnQuant, MAX_COLORS};
pub use error::QuantizeError;
