//! Input side of the pipeline: the pixel buffer and its alpha pre-scan.

mod analysis;
mod pixels;

pub use analysis::{scan_alpha, AlphaProfile};
pub use pixels::PixelSource;
