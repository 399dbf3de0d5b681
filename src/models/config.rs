use crate::error::ConfigError;
use pnn_quant::{ChannelWeights, PnnQuant, DEFAULT_ALPHA_THRESHOLD, MAX_COLORS};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Smallest palette the front end will ask for.
pub const MIN_COLORS: usize = 2;

/// Quantizer settings loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Target palette size
    pub colors: usize,

    /// Error diffusion (`true`) or raster + blue noise (`false`)
    pub dither: bool,

    /// Alpha at or below which a pixel is fully transparent
    pub alpha_threshold: u8,

    /// Designate a transparent color when the image has one
    pub detect_transparency: bool,

    /// Strength of the blue-noise pass when dithering is off
    pub blue_noise_weight: f32,

    /// Channel weights overriding the per-image preset
    pub weights: Option<WeightsConfig>,
}

/// Channel weights as written in the config file
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct WeightsConfig {
    #[serde(default = "default_alpha_weight")]
    pub alpha: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

fn default_alpha_weight() -> f64 {
    1.0 / 3.0
}

impl From<WeightsConfig> for ChannelWeights {
    fn from(w: WeightsConfig) -> Self {
        ChannelWeights {
            alpha: w.alpha,
            red: w.red,
            green: w.green,
            blue: w.blue,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            colors: 256,
            dither: true,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            detect_transparency: true,
            blue_noise_weight: 1.0,
            weights: None,
        }
    }
}

impl AppConfig {
    /// Config path from the CLI flag, falling back to `CONFIG_FILE`
    pub fn resolve_path(cli: Option<PathBuf>) -> Option<PathBuf> {
        cli.or_else(|| std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from))
    }

    /// Load configuration, using defaults when no path is given or the
    /// file does not exist. A file that exists but does not parse is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            colors = config.colors,
            dither = config.dither,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document gives defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Palette size clamped to what the front end supports.
    pub fn effective_colors(&self) -> usize {
        self.colors.clamp(MIN_COLORS, MAX_COLORS)
    }

    /// Quantizer configured from these settings
    pub fn quantizer(&self) -> PnnQuant {
        let quant = PnnQuant::new(self.effective_colors())
            .dither(self.dither)
            .alpha_threshold(self.alpha_threshold)
            .detect_transparency(self.detect_transparency)
            .blue_noise_weight(self.blue_noise_weight);
        match self.weights {
            Some(w) => quant.weights(w.into()),
            None => quant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.colors, 256);
        assert!(config.dither);
        assert_eq!(config.alpha_threshold, 0x0F);
        assert!(config.weights.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config = AppConfig::from_yaml("colors: 16\ndither: false\n").unwrap();
        assert_eq!(config.colors, 16);
        assert!(!config.dither);
        assert!(config.detect_transparency);
        assert_eq!(config.blue_noise_weight, 1.0);
    }

    #[test]
    fn test_parse_weights() {
        let yaml = r#"
weights:
  red: 0.5
  green: 0.25
  blue: 0.25
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let weights: ChannelWeights = config.weights.unwrap().into();
        assert_eq!(weights.red, 0.5);
        assert!((weights.alpha - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(AppConfig::from_yaml("colors: [1, 2").is_err());
        assert!(AppConfig::from_yaml("colors: many").is_err());
    }

    #[test]
    fn test_effective_colors_clamped() {
        let mut config = AppConfig::default();
        config.colors = 1;
        assert_eq!(config.effective_colors(), 2);
        config.colors = 1_000_000;
        assert_eq!(config.effective_colors(), 65536);
        config.colors = 64;
        assert_eq!(config.quantizer().max_colors(), 64);
    }
}
