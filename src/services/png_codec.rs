//! PNG decoding to 8-bit RGBA and encoding of quantized images.
//!
//! Palettes of up to 256 entries are written as indexed PNGs at the
//! smallest bit depth that fits, with a tRNS chunk when any entry carries
//! alpha. Larger palettes fall back to 8-bit RGBA.

use std::io::Cursor;

use pnn_quant::QuantizedImage;

use crate::error::CodecError;

/// A decoded image as interleaved 8-bit RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Decode any PNG color type and bit depth to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| CodecError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(CodecError::Unsupported(format!(
            "{:?} samples after expansion",
            info.bit_depth
        )));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(CodecError::Unsupported("indexed data after expansion".to_string()))
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );

    Ok(DecodedImage {
        width: info.width as usize,
        height: info.height as usize,
        rgba,
    })
}

/// Encode a quantized image as PNG.
pub fn encode_png(image: &QuantizedImage) -> Result<Vec<u8>, CodecError> {
    let (width, height) = dimensions(image)?;
    let palette = image.palette();

    if palette.len() <= 256 {
        let (bit_depth, bits) = match palette.len() {
            0..=2 => (png::BitDepth::One, 1),
            3..=4 => (png::BitDepth::Two, 2),
            5..=16 => (png::BitDepth::Four, 4),
            _ => (png::BitDepth::Eight, 8),
        };
        let plte: Vec<u8> = palette
            .entries()
            .iter()
            .flat_map(|c| [c.r, c.g, c.b])
            .collect();
        let trns = palette.has_alpha().then(|| transparency_chunk(image));
        let indices: Vec<u8> = image.indices().iter().map(|&i| i as u8).collect();
        let packed = if bits < 8 {
            pack_nbits(&indices, width, bits)
        } else {
            indices
        };
        encode(
            width,
            height,
            png::ColorType::Indexed,
            bit_depth,
            Some((plte.as_slice(), trns.as_deref())),
            &packed,
        )
    } else {
        encode(
            width,
            height,
            png::ColorType::Rgba,
            png::BitDepth::Eight,
            None,
            &image.to_rgba8(),
        )
    }
}

fn dimensions(image: &QuantizedImage) -> Result<(u32, u32), CodecError> {
    let unsupported = || CodecError::UnsupportedDimensions {
        width: image.width(),
        height: image.height(),
    };
    if image.width() == 0 || image.height() == 0 {
        return Err(unsupported());
    }
    let width = u32::try_from(image.width()).map_err(|_| unsupported())?;
    let height = u32::try_from(image.height()).map_err(|_| unsupported())?;
    Ok((width, height))
}

/// Alpha of each palette entry, trimmed after the last non-opaque one.
fn transparency_chunk(image: &QuantizedImage) -> Vec<u8> {
    let alphas: Vec<u8> = image.palette().entries().iter().map(|c| c.a).collect();
    let keep = alphas.iter().rposition(|&a| a != 255).map_or(0, |i| i + 1);
    alphas[..keep].to_vec()
}

/// Encode packed pixel data as a PNG.
fn encode(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    palette: Option<(&[u8], Option<&[u8]>)>,
    packed: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some((plte, trns)) = palette {
            encoder.set_palette(plte);
            if let Some(trns) = trns {
                encoder.set_trns(trns);
            }
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnn_quant::{Argb, Palette};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_nbits_pads_rows() {
        // 3 pixels per row at 2 bits: one byte per row, low bits zero.
        let packed = pack_nbits(&[1, 2, 3, 3, 2, 1], 3, 2);
        assert_eq!(packed, vec![0b01_10_11_00, 0b11_10_01_00]);
    }

    #[test]
    fn test_pack_nbits_one_bit() {
        let packed = pack_nbits(&[1, 0, 1, 0, 1, 0, 1, 0, 1], 9, 1);
        assert_eq!(packed, vec![0b1010_1010, 0b1000_0000]);
    }

    #[test]
    fn test_transparency_chunk_trims_opaque_tail() {
        let palette = Palette::new(vec![Argb::TRANSPARENT, Argb::new(128, 0, 0, 0), Argb::BLACK]).unwrap();
        let image = QuantizedImage::new(vec![0, 1, 2], 3, 1, palette, 3);
        assert_eq!(transparency_chunk(&image), vec![0, 128]);
    }

    #[test]
    fn test_indexed_round_trip() {
        let palette = Palette::new(vec![Argb::TRANSPARENT, Argb::rgb(255, 0, 0), Argb::rgb(0, 0, 255)]).unwrap();
        let image = QuantizedImage::new(vec![0, 1, 2, 1, 2, 0], 3, 2, palette, 3);
        let png_bytes = encode_png(&image).unwrap();
        let decoded = decode_png(&png_bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba, image.to_rgba8());
    }

    #[test]
    fn test_zero_size_rejected() {
        let image = QuantizedImage::new(Vec::new(), 0, 0, Palette::empty(), 16);
        assert!(matches!(
            encode_png(&image),
            Err(CodecError::UnsupportedDimensions { .. })
        ));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            decode_png(b"not a png"),
            Err(CodecError::PngDecode(_))
        ));
    }
}
