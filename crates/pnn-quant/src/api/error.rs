//! Error type for the pnn-quant public API.

use thiserror::Error;

use crate::palette::PaletteError;

/// Error returned by the quantization entry points.
///
/// # Example
///
/// ```
/// use pnn_quant::{PnnQuant, PixelSource, QuantizeError, Argb};
///
/// let pixels = [Argb::BLACK];
/// let source = PixelSource::new(&pixels, 1, 1).unwrap();
/// assert_eq!(
///     PnnQuant::new(0).quantize(&source).unwrap_err(),
///     QuantizeError::InvalidColorCount(0)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// Requested palette size outside `1..=65536`
    #[error("palette size must be between 1 and 65536, got {0}")]
    InvalidColorCount(usize),
    /// Pixel buffer length does not match the dimensions
    #[error("pixel buffer of {len} does not match {width}x{height}")]
    DimensionMismatch {
        /// Buffer length in pixels
        len: usize,
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
    },
    /// Caller-supplied palette rejected
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),
}
