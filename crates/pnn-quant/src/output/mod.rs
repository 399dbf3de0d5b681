//! Output of the quantization pipeline.
//!
//! [`QuantizedImage`] owns the palette and one `u16` index per pixel. The
//! indexed form is canonical; ARGB and RGBA expansions are computed on
//! demand.

mod quantized_image;

pub use quantized_image::QuantizedImage;
