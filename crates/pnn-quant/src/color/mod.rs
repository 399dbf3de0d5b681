//! Color types and distance utilities
//!
//! - [`Argb`]: packed 8-bit color with alpha, the pixel type of the crate
//! - [`ChannelWeights`]: per-channel weights for squared-difference metrics
//! - [`BinKeyMode`]: 16-bit color keys for histogram bins and lookup caches

mod argb;
mod key;
mod weights;

pub use argb::Argb;
pub use key::{BinKeyMode, KEY_SPACE};
pub use weights::ChannelWeights;
pub(crate) use weights::sqr;
