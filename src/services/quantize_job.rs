use std::path::{Path, PathBuf};

use pnn_quant::{PixelSource, QuantizedImage};

use crate::error::AppError;
use crate::models::AppConfig;
use crate::services::png_codec::{decode_png, encode_png};

/// Outcome of one quantize run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub requested_colors: usize,
    pub colors: usize,
    pub bytes: usize,
}

/// Decode, quantize and re-encode PNG images with one set of settings
pub struct QuantizeJob {
    config: AppConfig,
}

impl QuantizeJob {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Quantize PNG bytes, returning the encoded PNG and the quantized image.
    pub fn process(&self, png_bytes: &[u8]) -> Result<(Vec<u8>, QuantizedImage), AppError> {
        let decoded = decode_png(png_bytes)?;
        let source = PixelSource::from_rgba8(&decoded.rgba, decoded.width, decoded.height)?;
        let image = self.config.quantizer().quantize(&source)?;
        let encoded = encode_png(&image)?;
        Ok((encoded, image))
    }

    /// Quantize the PNG at `input` and write the result to `output`.
    pub fn run(&self, input: &Path, output: &Path) -> Result<JobReport, AppError> {
        let png_bytes = std::fs::read(input).map_err(|source| AppError::Io {
            path: input.to_path_buf(),
            source,
        })?;

        let (encoded, image) = self.process(&png_bytes)?;

        std::fs::write(output, &encoded).map_err(|source| AppError::Io {
            path: output.to_path_buf(),
            source,
        })?;

        let report = JobReport {
            output: output.to_path_buf(),
            width: image.width(),
            height: image.height(),
            requested_colors: image.requested_colors(),
            colors: image.palette().len(),
            bytes: encoded.len(),
        };
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            width = report.width,
            height = report.height,
            colors = report.colors,
            requested = report.requested_colors,
            "Quantized image"
        );
        Ok(report)
    }
}

/// `<dir>/<stem>-PNNquant<colors>.png` next to `input`
pub fn default_output_path(input: &Path, colors: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}-PNNquant{colors}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("images/photo.png"), 256),
            PathBuf::from("images/photo-PNNquant256.png")
        );
        assert_eq!(
            default_output_path(Path::new("cat.v2.png"), 16),
            PathBuf::from("cat.v2-PNNquant16.png")
        );
    }

    #[test]
    fn test_process_rejects_garbage() {
        let job = QuantizeJob::new(AppConfig::default());
        assert!(matches!(job.process(b"nope"), Err(AppError::Codec(_))));
    }
}
