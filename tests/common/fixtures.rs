//! Test fixtures: in-memory PNG builders and decoders.

use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encode an 8-bit RGBA image as PNG bytes.
pub fn rgba_png(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Rgba, rgba)
}

/// Encode an 8-bit RGB image as PNG bytes.
pub fn rgb_png(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Rgb, rgb)
}

/// Encode an 8-bit grayscale image as PNG bytes.
pub fn gray_png(width: u32, height: u32, gray: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Grayscale, gray)
}

fn encode(width: u32, height: u32, color_type: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    buf.into_inner()
}

/// Smooth RGB gradient with `width * height` mostly distinct colors.
pub fn gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            out.extend_from_slice(&[
                (x * 255 / (width - 1).max(1)) as u8,
                (y * 255 / (height - 1).max(1)) as u8,
                ((x + y) * 5 % 256) as u8,
                255,
            ]);
        }
    }
    out
}

/// Write PNG bytes into `dir` and return the path.
pub fn write_png(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Header facts of a PNG as written (no transformations applied).
#[derive(Debug)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub color_type: png::ColorType,
    pub bit_depth: png::BitDepth,
    pub palette_len: Option<usize>,
    pub trns: Option<Vec<u8>>,
}

pub fn read_header(bytes: &[u8]) -> PngHeader {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    PngHeader {
        width: info.width,
        height: info.height,
        color_type: info.color_type,
        bit_depth: info.bit_depth,
        palette_len: info.palette.as_ref().map(|p| p.len() / 3),
        trns: info.trns.as_ref().map(|t| t.to_vec()),
    }
}
