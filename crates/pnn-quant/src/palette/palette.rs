//! Ordered color palette.

use super::PaletteError;
use crate::color::Argb;

/// Largest palette a `u16` index buffer can address.
pub const MAX_PALETTE_SIZE: usize = 1 << 16;

/// Ordered list of palette colors.
///
/// Index 0 holds the canonical transparent color whenever the source image
/// designated one and the palette has room for it.
///
/// # Example
///
/// ```
/// use pnn_quant::{Argb, Palette};
///
/// let palette = Palette::new(vec![Argb::TRANSPARENT, Argb::BLACK]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.transparent_slot(), Some(0));
/// assert!(Palette::new(Vec::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    entries: Vec<Argb>,
}

impl Palette {
    /// Build a palette from caller-supplied colors.
    pub fn new(entries: Vec<Argb>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }
        if entries.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors(entries.len()));
        }
        Ok(Self { entries })
    }

    /// The palette of a zero-size image.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries produced by clustering, already bounded by the target size.
    pub(crate) fn from_entries(entries: Vec<Argb>) -> Self {
        debug_assert!(entries.len() <= MAX_PALETTE_SIZE);
        Self { entries }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Argb> {
        self.entries.get(index).copied()
    }

    /// All entries in index order.
    #[inline]
    pub fn entries(&self) -> &[Argb] {
        &self.entries
    }

    /// Position of the first fully transparent entry.
    pub fn transparent_slot(&self) -> Option<u16> {
        self.entries
            .iter()
            .position(|c| c.a == 0)
            .map(|i| i as u16)
    }

    /// Whether any entry is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.entries.iter().any(|c| !c.is_opaque())
    }
}

impl std::ops::Index<u16> for Palette {
    type Output = Argb;

    #[inline]
    fn index(&self, index: u16) -> &Argb {
        &self.entries[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_oversized() {
        let entries = vec![Argb::BLACK; MAX_PALETTE_SIZE + 1];
        assert_eq!(
            Palette::new(entries),
            Err(PaletteError::TooManyColors(MAX_PALETTE_SIZE + 1))
        );
    }

    #[test]
    fn test_transparent_slot_and_alpha() {
        let opaque = Palette::new(vec![Argb::BLACK, Argb::WHITE]).unwrap();
        assert_eq!(opaque.transparent_slot(), None);
        assert!(!opaque.has_alpha());

        let mixed = Palette::new(vec![Argb::WHITE, Argb::new(128, 1, 2, 3), Argb::TRANSPARENT]).unwrap();
        assert_eq!(mixed.transparent_slot(), Some(2));
        assert!(mixed.has_alpha());
        assert_eq!(mixed[1u16], Argb::new(128, 1, 2, 3));
    }
}
