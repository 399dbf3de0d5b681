//! Pixel buffer view handed to the quantizer.

use std::borrow::Cow;

use crate::api::QuantizeError;
use crate::color::Argb;

/// A row-major ARGB image, borrowed or owned.
///
/// Construction validates that the buffer length matches the dimensions,
/// so everything downstream can index `y * width + x` without checks.
///
/// # Example
///
/// ```
/// use pnn_quant::{Argb, PixelSource};
///
/// let pixels = [Argb::rgb(255, 0, 0), Argb::rgb(0, 0, 255)];
/// let source = PixelSource::new(&pixels, 2, 1).unwrap();
/// assert_eq!(source.len(), 2);
///
/// assert!(PixelSource::new(&pixels, 3, 1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PixelSource<'a> {
    pixels: Cow<'a, [Argb]>,
    width: usize,
    height: usize,
}

impl<'a> PixelSource<'a> {
    /// Wrap a borrowed pixel slice.
    pub fn new(pixels: &'a [Argb], width: usize, height: usize) -> Result<Self, QuantizeError> {
        check_dimensions(pixels.len(), width, height)?;
        Ok(Self {
            pixels: Cow::Borrowed(pixels),
            width,
            height,
        })
    }

    /// Build from packed `0xAARRGGBB` values.
    pub fn from_packed(packed: &[u32], width: usize, height: usize) -> Result<Self, QuantizeError> {
        check_dimensions(packed.len(), width, height)?;
        Ok(Self {
            pixels: Cow::Owned(packed.iter().map(|&p| Argb::from_u32(p)).collect()),
            width,
            height,
        })
    }

    /// Build from interleaved RGBA bytes (4 bytes per pixel).
    pub fn from_rgba8(bytes: &[u8], width: usize, height: usize) -> Result<Self, QuantizeError> {
        if bytes.len() % 4 != 0 {
            return Err(QuantizeError::DimensionMismatch {
                len: bytes.len() / 4,
                width,
                height,
            });
        }
        check_dimensions(bytes.len() / 4, width, height)?;
        Ok(Self {
            pixels: Cow::Owned(
                bytes
                    .chunks_exact(4)
                    .map(|p| Argb::new(p[3], p[0], p[1], p[2]))
                    .collect(),
            ),
            width,
            height,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Argb] {
        &self.pixels
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Argb {
        self.pixels[y * self.width + x]
    }
}

fn check_dimensions(len: usize, width: usize, height: usize) -> Result<(), QuantizeError> {
    if width.checked_mul(height) != Some(len) {
        return Err(QuantizeError::DimensionMismatch { len, width, height });
    }
    Ok(())
}
