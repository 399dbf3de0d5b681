//! 16-bit color keys
//!
//! The histogram and the small-palette lookup caches both collapse a full
//! ARGB color into one of 65536 cells. How many bits each channel keeps
//! depends on what the image needs to distinguish.

use super::Argb;

/// Number of distinct keys any [`BinKeyMode`] can produce.
pub const KEY_SPACE: usize = 1 << 16;

/// Channel packing used to derive a 16-bit key from a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinKeyMode {
    /// 5-6-5 RGB, alpha ignored. Used for fully opaque images.
    Rgb565,
    /// 1-5-5-5 ARGB. Used when a transparent pixel must stay separate.
    Argb1555,
    /// 4-4-4-4 ARGB. Used when the image carries partial transparency.
    Argb4444,
}

impl BinKeyMode {
    /// Pick the packing for an image.
    ///
    /// Semi-transparency needs real alpha resolution; a single transparent
    /// color (or a small target palette) only needs one alpha bit.
    pub fn select(has_semi_transparency: bool, has_transparency: bool) -> Self {
        if has_semi_transparency {
            BinKeyMode::Argb4444
        } else if has_transparency {
            BinKeyMode::Argb1555
        } else {
            BinKeyMode::Rgb565
        }
    }

    /// Collapse a color to its key.
    #[inline]
    pub fn key(self, c: Argb) -> usize {
        let (a, r, g, b) = (c.a as usize, c.r as usize, c.g as usize, c.b as usize);
        match self {
            BinKeyMode::Argb4444 => (a & 0xF0) << 8 | (r & 0xF0) << 4 | (g & 0xF0) | b >> 4,
            BinKeyMode::Argb1555 => (a & 0x80) << 8 | (r & 0xF8) << 7 | (g & 0xF8) << 2 | b >> 3,
            BinKeyMode::Rgb565 => (r & 0xF8) << 8 | (g & 0xFC) << 3 | b >> 3,
        }
    }
}
