//! Conversion of surviving clusters into palette entries.

use super::Palette;
use crate::color::Argb;
use crate::context::QuantContext;
use crate::quantize::Bin;

/// Round each surviving bin to an 8-bit color and place the transparent
/// entry.
///
/// Alpha is kept only when the image has transparency or partial alpha;
/// otherwise every entry is opaque. With a designated transparent color,
/// the first entry whose alpha rounds to 0 moves to slot 0 and takes the
/// canonical transparent value. A two-entry palette without such an entry
/// swaps its slots instead.
pub fn finalize(bins: &[Bin], ctx: &QuantContext) -> Palette {
    let keep_alpha = ctx.has_transparency() || ctx.has_semi_transparency;
    let mut entries: Vec<Argb> = bins
        .iter()
        .map(|bin| {
            let a = if keep_alpha { bin.a.round() as f32 } else { 255.0 };
            Argb::from_clamped(a, bin.r.round() as f32, bin.g.round() as f32, bin.b.round() as f32)
        })
        .collect();

    if let Some(t) = ctx.transparent {
        match entries.iter().position(|c| c.a == 0) {
            Some(k) => {
                entries.swap(0, k);
                entries[0] = t.color;
            }
            None if entries.len() == 2 => entries.swap(0, 1),
            None => {}
        }
    }

    Palette::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DEFAULT_ALPHA_THRESHOLD;
    use crate::source::PixelSource;

    fn ctx_for(pixels: &[Argb]) -> QuantContext {
        let source = PixelSource::new(pixels, pixels.len(), 1).unwrap();
        QuantContext::new(&source, 8, DEFAULT_ALPHA_THRESHOLD, true, None)
    }

    fn bin(a: f64, r: f64, g: f64, b: f64) -> Bin {
        Bin {
            a,
            r,
            g,
            b,
            count: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rounds_and_forces_opaque() {
        let ctx = ctx_for(&[Argb::rgb(1, 2, 3)]);
        let palette = finalize(&[bin(200.0, 10.4, 10.5, 254.6)], &ctx);
        assert_eq!(palette.entries(), &[Argb::new(255, 10, 11, 255)]);
    }

    #[test]
    fn test_transparent_entry_moves_to_slot_zero() {
        let ctx = ctx_for(&[Argb::rgb(1, 2, 3), Argb::new(0, 0, 0, 0)]);
        let bins = [
            bin(255.0, 1.0, 2.0, 3.0),
            bin(255.0, 90.0, 90.0, 90.0),
            bin(0.0, 255.0, 255.0, 255.0),
        ];
        let palette = finalize(&bins, &ctx);
        assert_eq!(palette[0u16], Argb::TRANSPARENT);
        assert_eq!(palette[2u16], Argb::rgb(1, 2, 3));
        assert_eq!(palette.transparent_slot(), Some(0));
    }

    #[test]
    fn test_two_entries_without_transparent_bin_swap() {
        let ctx = ctx_for(&[Argb::rgb(1, 2, 3), Argb::new(0, 0, 0, 0)]);
        let bins = [bin(255.0, 0.0, 0.0, 0.0), bin(128.0, 255.0, 255.0, 255.0)];
        let palette = finalize(&bins, &ctx);
        assert_eq!(palette.entries(), &[Argb::new(128, 255, 255, 255), Argb::BLACK]);
    }

    #[test]
    fn test_semi_transparency_keeps_alpha() {
        let ctx = ctx_for(&[Argb::new(128, 1, 2, 3)]);
        assert!(ctx.has_semi_transparency);
        let palette = finalize(&[bin(127.6, 1.0, 2.0, 3.0)], &ctx);
        assert_eq!(palette[0u16].a, 128);
    }
}
