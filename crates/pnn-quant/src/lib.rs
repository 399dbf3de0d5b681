#![allow(clippy::module_inception)]

//! pnn-quant: pairwise nearest neighbor color quantization
//!
//! This library reduces a true-color ARGB image to a palette of at most a
//! requested size and maps every pixel onto it.
//!
//! # Quick Start
//!
//! The [`PnnQuant`] builder is the primary entry point:
//!
//! ```
//! use pnn_quant::{Argb, PixelSource, PnnQuant};
//!
//! let pixels: Vec<Argb> = (0..64u8).map(|i| Argb::rgb(i * 4, 128, 255 - i * 4)).collect();
//! let source = PixelSource::new(&pixels, 8, 8).unwrap();
//!
//! let image = PnnQuant::new(16).quantize(&source).unwrap();
//! assert!(image.palette().len() <= 16);
//! assert_eq!(image.indices().len(), 64);
//! ```
//!
//! # Pipeline
//!
//! 1. **Analysis** ([`QuantContext`]): detect partial alpha and the
//!    designated transparent pixel, choose channel weights.
//! 2. **Histogram** ([`Histogram`]): bucket pixels by a 16-bit color key and
//!    average each bucket.
//! 3. **Clustering** ([`ClusterReducer`]): merge the cheapest pair of
//!    buckets, weighted by population, until the target size is reached.
//! 4. **Index resolution**: either error diffusion along a Gilbert curve
//!    ([`ErrorDiffuser`]) or a raster pass refined by blue noise
//!    ([`BlueNoiseModulator`]).
//!
//! # Transparency
//!
//! With detection on, every pixel at or below the alpha threshold becomes
//! the canonical [`Argb::TRANSPARENT`]. That color is kept out of
//! clustering, lands in palette slot 0, and never diffuses error into its
//! neighbors.

pub mod api;
pub mod color;
pub mod context;
pub mod dither;
pub mod output;
pub mod palette;
pub mod quantize;
pub mod source;


pub use api::{PnnQuant, QuantizeError, MAX_COLORS};
pub use color::{Argb, BinKeyMode, ChannelWeights};
pub use context::{QuantContext, TransparentPixel, DEFAULT_ALPHA_THRESHOLD};
pub use dither::{BlueNoiseModulator, ErrorDiffuser, GilbertCurve};
pub use output::QuantizedImage;
pub use palette::{ColorIndexResolver, MatchMode, Palette, PaletteError};
pub use quantize::{ClusterReducer, Histogram, PnnQuantizer, Quantizer};
pub use source::PixelSource;
