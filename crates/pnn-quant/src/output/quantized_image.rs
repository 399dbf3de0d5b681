//! QuantizedImage: palette indices plus the palette they index.

use crate::color::Argb;
use crate::palette::Palette;

/// A palettized image.
///
/// Stores one palette index per pixel in row-major order, the image
/// dimensions, and the palette. Every index is below `palette().len()`.
///
/// # Example
///
/// ```
/// use pnn_quant::{Argb, Palette, QuantizedImage};
///
/// let palette = Palette::new(vec![Argb::BLACK, Argb::WHITE]).unwrap();
/// let image = QuantizedImage::new(vec![0, 1, 1, 0], 2, 2, palette, 2);
///
/// assert_eq!(image.color_at(1, 0), Some(Argb::WHITE));
/// assert_eq!(image.to_rgba8().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedImage {
    indices: Vec<u16>,
    width: usize,
    height: usize,
    palette: Palette,
    requested_colors: usize,
}

impl QuantizedImage {
    /// Wrap resolved indices.
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(
        indices: Vec<u16>,
        width: usize,
        height: usize,
        palette: Palette,
        requested_colors: usize,
    ) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match {}x{}",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
            requested_colors,
        }
    }

    /// Palette indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
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

    /// The palette the indices refer to.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette size that was asked for. [`palette`](Self::palette) may be
    /// smaller when the image has fewer distinct colors.
    #[inline]
    pub fn requested_colors(&self) -> usize {
        self.requested_colors
    }

    /// Color of the pixel at `(x, y)`.
    pub fn color_at(&self, x: usize, y: usize) -> Option<Argb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.palette.get(self.indices[y * self.width + x] as usize)
    }

    /// Expand to one [`Argb`] per pixel.
    pub fn to_argb(&self) -> Vec<Argb> {
        self.indices.iter().map(|&i| self.palette[i]).collect()
    }

    /// Expand to 8-bit RGBA bytes, 4 per pixel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.indices
            .iter()
            .flat_map(|&i| self.palette[i].to_rgba())
            .collect()
    }

    /// Consume the image, returning indices and palette.
    pub fn into_parts(self) -> (Vec<u16>, Palette) {
        (self.indices, self.palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansions() {
        let palette = Palette::new(vec![Argb::TRANSPARENT, Argb::rgb(1, 2, 3)]).unwrap();
        let image = QuantizedImage::new(vec![1, 0], 2, 1, palette, 4);
        assert_eq!(image.to_argb(), vec![Argb::rgb(1, 2, 3), Argb::TRANSPARENT]);
        assert_eq!(image.to_rgba8(), vec![1, 2, 3, 255, 255, 255, 255, 0]);
        assert_eq!(image.requested_colors(), 4);
        assert_eq!(image.color_at(2, 0), None);
    }
}
