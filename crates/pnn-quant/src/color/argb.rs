//! Packed 8-bit ARGB color type
//!
//! [`Argb`] is the pixel currency of the whole crate: the histogram, the
//! palette, the index resolver and the ditherers all read and write it.

/// An 8-bit-per-channel color with alpha.
///
/// Packs to and from the conventional `0xAARRGGBB` layout used by most
/// raster APIs.
///
/// # Example
///
/// ```
/// use pnn_quant::Argb;
///
/// let c = Argb::from_u32(0x80FF4020);
/// assert_eq!((c.a, c.r, c.g, c.b), (0x80, 0xFF, 0x40, 0x20));
/// assert_eq!(c.to_u32(), 0x80FF4020);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb {
    /// Alpha channel (0 = fully transparent, 255 = opaque)
    pub a: u8,
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Argb {
    /// Canonical fully transparent color (`0x00FFFFFF`).
    ///
    /// Every pixel at or below the alpha threshold is coerced to this value
    /// before it enters the histogram.
    pub const TRANSPARENT: Self = Self::new(0, 255, 255, 255);

    /// Opaque black.
    pub const BLACK: Self = Self::new(255, 0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a color from its four channels.
    #[inline]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    /// Unpack from `0xAARRGGBB`.
    #[inline]
    pub const fn from_u32(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into `0xAARRGGBB`.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Build a color from four floating-point channel values.
    ///
    /// Each channel is clamped to `0.0..=255.0` and truncated, the same
    /// conversion the ditherers apply to error-corrected values.
    #[inline]
    pub fn from_clamped(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self {
            a: clamp_channel(a),
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Channels as `[a, r, g, b]` floats, the layout of an error box.
    #[inline]
    pub fn channels(self) -> [f32; 4] {
        [self.a as f32, self.r as f32, self.g as f32, self.b as f32]
    }

    /// Channels as `[r, g, b, a]` bytes, the layout PNG encoders expect.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether the color is fully opaque.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl From<u32> for Argb {
    fn from(argb: u32) -> Self {
        Self::from_u32(argb)
    }
}

impl From<Argb> for u32 {
    fn from(c: Argb) -> Self {
        c.to_u32()
    }
}

#[inline]
fn clamp_channel(v: f32) -> u8 {
    // Float-to-int `as` saturates and maps NaN to 0.
    v.clamp(0.0, 255.0) as u8
}
