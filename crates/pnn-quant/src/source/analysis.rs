//! Transparency pre-scan.
//!
//! Before any histogram is built the whole image is scanned once to learn
//! whether it carries partial alpha and whether a fully transparent pixel
//! exists. Both facts change how colors are keyed, merged and matched.

use crate::color::Argb;

/// Alpha facts about one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlphaProfile {
    /// Some pixel has alpha strictly between the threshold and 255.
    pub has_semi_transparency: bool,
    /// Row-major index of the first pixel at or below the alpha threshold.
    pub transparent_pixel: Option<usize>,
}

/// Scan `pixels` for partial and full transparency.
///
/// With `detect_transparency` off, low-alpha pixels are not designated
/// transparent and count as partial alpha instead.
pub fn scan_alpha(pixels: &[Argb], alpha_threshold: u8, detect_transparency: bool) -> AlphaProfile {
    let mut profile = AlphaProfile::default();
    for (i, p) in pixels.iter().enumerate() {
        if p.a == 255 {
            continue;
        }
        if detect_transparency && p.a <= alpha_threshold {
            profile.transparent_pixel.get_or_insert(i);
        } else {
            profile.has_semi_transparency = true;
        }
        if profile.has_semi_transparency && profile.transparent_pixel.is_some() {
            break;
        }
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_image() {
        let pixels = vec![Argb::rgb(1, 2, 3); 10];
        assert_eq!(scan_alpha(&pixels, 0x0F, true), AlphaProfile::default());
    }

    #[test]
    fn test_finds_first_transparent_pixel() {
        let pixels = [
            Argb::rgb(0, 0, 0),
            Argb::new(0x0F, 9, 9, 9),
            Argb::new(0, 0, 0, 0),
        ];
        let profile = scan_alpha(&pixels, 0x0F, true);
        assert_eq!(profile.transparent_pixel, Some(1));
        assert!(!profile.has_semi_transparency);
    }

    #[test]
    fn test_semi_transparency() {
        let pixels = [Argb::rgb(0, 0, 0), Argb::new(128, 9, 9, 9)];
        let profile = scan_alpha(&pixels, 0x0F, true);
        assert!(profile.has_semi_transparency);
        assert_eq!(profile.transparent_pixel, None);
    }

    #[test]
    fn test_detection_disabled() {
        let pixels = [Argb::new(0, 0, 0, 0)];
        let profile = scan_alpha(&pixels, 0x0F, false);
        assert_eq!(profile.transparent_pixel, None);
        assert!(profile.has_semi_transparency);
    }
}
