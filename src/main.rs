use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use reverse_isp_rs::image_pipeline::{
    CfaPattern, NoiseConfig, PipelineConfig, PipelineVariant, RemosaicConfig, ReversePipeline,
};
use reverse_isp_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "reverse-isp")]
#[command(version, about = "Reverse a camera pipeline: display-referred RGB to simulated sensor data")]
struct Cli {
    /// Input batch file or TIFF image
    input: PathBuf,

    /// Output path
    output: PathBuf,

    /// Camera calibration file
    #[arg(long, default_value = "camera_models/NikonD7000.txt")]
    model: PathBuf,

    /// White-balance setting to select from the calibration file
    #[arg(long, default_value_t = 6)]
    wb_index: usize,

    /// Number of RBF control points per gamut direction
    #[arg(long, default_value_t = 3702)]
    ctrl_pts: usize,

    #[arg(long, value_enum, default_value_t = Variant::Full)]
    variant: Variant,

    /// Input/output container, inferred from the input extension when omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Standard deviation of the added sensor noise
    #[arg(long, default_value_t = 0.01)]
    noise_sigma: f32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Skip noise injection
    #[arg(long)]
    no_renoise: bool,

    /// Skip colour filter array resampling
    #[arg(long)]
    no_remosaic: bool,

    /// Re-interpolate full RGB after resampling
    #[arg(long)]
    demosaic: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// Full reverse pipeline including the colour transform
    Full,
    /// Stop after the reverse gamut map
    NoTransform,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Cifar,
    Tiff,
}

impl Cli {
    fn config(&self) -> PipelineConfig {
        PipelineConfig::builder()
            .model_path(&self.model)
            .wb_index(self.wb_index)
            .num_ctrl_pts(self.ctrl_pts)
            .variant(match self.variant {
                Variant::Full => PipelineVariant::FullReverse,
                Variant::NoTransform => PipelineVariant::StopBeforeTransform,
            })
            .renoise((!self.no_renoise).then_some(NoiseConfig {
                sigma: self.noise_sigma,
                seed: self.seed,
            }))
            .remosaic((!self.no_remosaic).then_some(RemosaicConfig {
                cfa: CfaPattern::Rggb,
                demosaic: self.demosaic,
            }))
            .build()
    }

    fn format(&self) -> Format {
        self.format.unwrap_or_else(|| {
            let is_tiff = self
                .input
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"));
            if is_tiff { Format::Tiff } else { Format::Cifar }
        })
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let pipeline = ReversePipeline::new(config)
        .with_context(|| format!("loading camera model {}", cli.model.display()))?;

    info!("Reverse pipeline initialized");
    info!("Variant: {:?}", pipeline.config().variant);
    info!("White balance index: {}", pipeline.config().wb_index);

    match cli.format() {
        Format::Tiff => {
            pipeline
                .convert_file(&cli.input, &cli.output)
                .with_context(|| format!("converting {}", cli.input.display()))?;
        }
        Format::Cifar => {
            let report = pipeline
                .convert_batch_file(&cli.input, &cli.output)
                .with_context(|| format!("converting batch {}", cli.input.display()))?;
            if report.records.is_empty() && !report.failed.is_empty() {
                bail!("all {} images failed", report.failed.len());
            }
        }
    }

    Ok(())
}

fn input_openable(path: &Path) -> bool {
    std::fs::File::open(path).is_ok()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init();

    info!("Starting reverse-isp...");

    if !input_openable(&cli.input) {
        error!("Cannot open input file {}", cli.input.display());
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(()) => {
            info!("Conversion successful!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion failed: {:#}", e);
            ExitCode::from(3)
        }
    }
}
