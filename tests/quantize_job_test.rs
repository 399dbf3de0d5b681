//! End-to-end tests of the quantize job: PNG in, quantized PNG out.

mod common;

use common::*;
use nquant::error::AppError;
use nquant::models::AppConfig;
use nquant::services::{decode_png, QuantizeJob};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn job(colors: usize, dither: bool) -> QuantizeJob {
    QuantizeJob::new(AppConfig {
        colors,
        dither,
        ..AppConfig::default()
    })
}

#[test]
fn test_gradient_to_sixteen_colors() {
    let input = rgba_png(40, 30, &gradient_rgba(40, 30));
    let (output, image) = job(16, true).process(&input).unwrap();

    let header = read_header(&output);
    assert_eq!(header.color_type, png::ColorType::Indexed);
    assert_eq!(header.bit_depth, png::BitDepth::Four);
    assert_eq!(header.palette_len, Some(16));
    assert!(header.trns.is_none());
    assert_eq!((header.width, header.height), (40, 30));
    assert_eq!(image.palette().len(), 16);
}

#[test]
fn test_two_colors_use_one_bit() {
    let input = rgba_png(17, 5, &gradient_rgba(17, 5));
    let (output, _) = job(2, false).process(&input).unwrap();
    let header = read_header(&output);
    assert_eq!(header.bit_depth, png::BitDepth::One);
    assert_eq!(header.palette_len, Some(2));
}

#[test]
fn test_transparency_written_to_trns() {
    let mut rgba = gradient_rgba(8, 8);
    for px in rgba.chunks_exact_mut(4).take(8) {
        px[3] = 0;
    }
    let input = rgba_png(8, 8, &rgba);
    let (output, image) = job(8, true).process(&input).unwrap();

    let header = read_header(&output);
    let trns = header.trns.expect("tRNS chunk");
    assert_eq!(trns[0], 0);
    assert_eq!(image.indices()[..8], [0u16; 8]);

    let decoded = decode_png(&output).unwrap();
    assert!(decoded.rgba.chunks_exact(4).take(8).all(|px| px[3] == 0));
    assert!(decoded.rgba.chunks_exact(4).skip(8).all(|px| px[3] == 255));
}

#[test]
fn test_large_palette_falls_back_to_rgba() {
    let input = rgba_png(64, 64, &gradient_rgba(64, 64));
    let (output, image) = job(300, false).process(&input).unwrap();
    assert_eq!(image.palette().len(), 300);

    let header = read_header(&output);
    assert_eq!(header.color_type, png::ColorType::Rgba);
    let decoded = decode_png(&output).unwrap();
    assert_eq!(decoded.rgba, image.to_rgba8());
}

#[test]
fn test_rgb_and_gray_inputs() {
    let rgb: Vec<u8> = (0..12 * 4).flat_map(|i| [(i * 5) as u8, 100, (255 - i * 5) as u8]).collect();
    let (_, image) = job(4, true).process(&rgb_png(12, 4, &rgb)).unwrap();
    assert_eq!(image.indices().len(), 48);
    assert!(image.palette().entries().iter().all(|c| c.a == 255));

    let gray: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
    let (_, image) = job(4, true).process(&gray_png(8, 8, &gray)).unwrap();
    assert!(image.palette().entries().iter().all(|c| c.r == c.g && c.g == c.b));
}

#[test]
fn test_run_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_png(dir.path(), "in.png", &rgba_png(10, 10, &gradient_rgba(10, 10)));
    let output = dir.path().join("out.png");

    let report = job(8, true).run(&input, &output).unwrap();
    assert_eq!(report.output, output);
    assert_eq!(report.colors, 8);
    assert_eq!(report.requested_colors, 8);
    assert_eq!((report.width, report.height), (10, 10));

    let written = std::fs::read(&output).unwrap();
    assert_eq!(written.len(), report.bytes);
    assert_eq!(read_header(&written).palette_len, Some(8));
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = job(8, true).run(&dir.path().join("absent.png"), &dir.path().join("out.png"));
    assert!(matches!(result, Err(AppError::Io { .. })));
}

#[test]
fn test_output_is_deterministic() {
    let input = rgba_png(23, 19, &gradient_rgba(23, 19));
    for dither in [true, false] {
        let (a, _) = job(32, dither).process(&input).unwrap();
        let (b, _) = job(32, dither).process(&input).unwrap();
        assert_eq!(a, b);
    }
}
