use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use superres_core::consts::{DEFAULT_JPEG_QUALITY, DEFAULT_SEARCH_RADIUS};
use superres_core::pipeline::config::{
    AlignmentConfig, DifferenceNormalization, FusionStrategy, PipelineConfig,
    ReconstructionConfig,
};
use superres_core::pipeline::run_pipeline_reported;

use crate::progress::BarReporter;
use crate::summary::print_pipeline_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum NormalizationArg {
    Sum,
    Mean,
}

impl From<NormalizationArg> for DifferenceNormalization {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::Sum => DifferenceNormalization::Sum,
            NormalizationArg::Mean => DifferenceNormalization::Mean,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FusionArg {
    Reduction,
    RowLocked,
}

impl From<FusionArg> for FusionStrategy {
    fn from(arg: FusionArg) -> Self {
        match arg {
            FusionArg::Reduction => FusionStrategy::Reduction,
            FusionArg::RowLocked => FusionStrategy::RowLocked,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input images; the first one is the reference frame
    pub inputs: Vec<PathBuf>,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upscale factor (default: floor(sqrt(frame count)))
    #[arg(long)]
    pub scale: Option<u32>,

    /// Maximum shift in pixels searched during alignment
    #[arg(long, default_value_t = DEFAULT_SEARCH_RADIUS)]
    pub search_radius: u32,

    /// Alignment score normalization
    #[arg(long, value_enum, default_value = "sum")]
    pub normalization: NormalizationArg,

    /// Synchronization used when fusing frames in parallel
    #[arg(long, value_enum, default_value = "reduction")]
    pub fusion: FusionArg,

    /// Worker threads (default: one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub quality: u8,

    /// Output file path (.jpg or .png)
    #[arg(short, long, default_value = "result.jpg")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: PipelineConfig =
            toml::from_str(&contents).context("Invalid pipeline config")?;
        if !args.inputs.is_empty() {
            config.inputs = args.inputs.clone();
        }
        config
    } else {
        build_config_from_args(args)
    };

    if config.inputs.is_empty() {
        bail!("No input images given");
    }

    print_pipeline_summary(&config);

    let reporter = Arc::new(BarReporter::new()?);
    run_pipeline_reported(&config, reporter.clone())?;
    reporter.finish();

    println!("\nOutput saved to {}", config.output.display());
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> PipelineConfig {
    PipelineConfig {
        inputs: args.inputs.clone(),
        output: args.output.clone(),
        upscale_factor: args.scale,
        jpeg_quality: args.quality,
        reconstruction: ReconstructionConfig {
            alignment: AlignmentConfig {
                search_radius: args.search_radius,
                normalization: args.normalization.into(),
            },
            fusion: args.fusion.into(),
            threads: args.threads,
        },
    }
}
