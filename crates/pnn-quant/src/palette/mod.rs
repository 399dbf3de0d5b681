//! Palette types and the color-to-index resolver
//!
//! - [`Palette`]: the ordered entries a quantized image indexes into
//! - [`ColorIndexResolver`]: memoized nearest / alternating index lookup
//! - [`finalize`]: turns surviving clusters into palette entries

mod error;
mod finalize;
mod palette;
mod resolver;

pub use error::PaletteError;
pub use finalize::finalize;
pub use palette::{Palette, MAX_PALETTE_SIZE};
pub use resolver::{ColorIndexResolver, MatchMode, ALTERNATION_RATIO};
