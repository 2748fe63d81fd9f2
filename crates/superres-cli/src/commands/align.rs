use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use superres_core::align::estimate_offsets_with_progress;
use superres_core::consts::DEFAULT_SEARCH_RADIUS;
use superres_core::io::image_io::load_frame_set;
use superres_core::pipeline::config::AlignmentConfig;

use super::pipeline::NormalizationArg;

#[derive(Args)]
pub struct AlignArgs {
    /// Input images; the first one is the reference frame
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Maximum shift in pixels searched in each direction
    #[arg(long, default_value_t = DEFAULT_SEARCH_RADIUS)]
    pub search_radius: u32,

    /// Alignment score normalization
    #[arg(long, value_enum, default_value = "sum")]
    pub normalization: NormalizationArg,
}

pub fn run(args: &AlignArgs) -> Result<()> {
    println!("Reading {} frames...", args.inputs.len());
    let frames = load_frame_set(&args.inputs)?;

    let config = AlignmentConfig {
        search_radius: args.search_radius,
        normalization: args.normalization.into(),
    };

    let pb = ProgressBar::new(frames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Aligning [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let offsets = estimate_offsets_with_progress(&frames, &config, |done| {
        pb.set_position(done as u64)
    })?;
    pb.finish();

    println!();
    println!("{:>5}  {:>5}  {:>5}  File", "Frame", "dx", "dy");
    for (i, (offset, path)) in offsets.iter().zip(args.inputs.iter()).enumerate() {
        println!(
            "{:>5}  {:>5}  {:>5}  {}",
            i,
            offset.dx,
            offset.dy,
            path.display()
        );
    }

    Ok(())
}
