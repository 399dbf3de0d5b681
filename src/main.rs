use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nquant::models::AppConfig;
use nquant::services::{default_output_path, QuantizeJob};

#[derive(Parser)]
#[command(name = "nquant")]
#[command(about = "Reduce a PNG to a small palette with PNN clustering and Gilbert-curve dithering")]
struct Cli {
    /// Input PNG file
    input: PathBuf,

    /// Output PNG file (default: <input stem>-PNNquant<COLORS>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target palette size (2..=65536)
    #[arg(short = 'm', long)]
    colors: Option<usize>,

    /// Disable error diffusion and use the blue-noise raster pass
    #[arg(long)]
    no_dither: bool,

    /// Alpha at or below which a pixel counts as fully transparent
    #[arg(long)]
    alpha_threshold: Option<u8>,

    /// YAML config file (default: $CONFIG_FILE)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nquant=info,pnn_quant=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_path = AppConfig::resolve_path(cli.config);
    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(colors) = cli.colors {
        config.colors = colors;
    }
    if cli.no_dither {
        config.dither = false;
    }
    if let Some(threshold) = cli.alpha_threshold {
        config.alpha_threshold = threshold;
    }
    if config.effective_colors() != config.colors {
        tracing::warn!(
            requested = config.colors,
            using = config.effective_colors(),
            "Palette size out of range, clamping"
        );
    }

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input, config.effective_colors()));

    let job = QuantizeJob::new(config);
    let report = job.run(&cli.input, &output)?;

    println!(
        "Quantized {} ({} colors, {} bytes)",
        report.output.display(),
        report.colors,
        report.bytes
    );

    Ok(())
}
