use std::sync::Arc;

use tracing::{debug, info};

use crate::align::align_frames_with_progress;
use crate::error::{Result, SuperResError};
use crate::frame::{FrameSet, Raster};
use crate::io::image_io::{load_frame_set_with_progress, save_raster};
use crate::stack::fuse_frames_with_progress;

use super::config::{PipelineConfig, ReconstructionConfig};
use super::helpers::default_upscale_factor;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// Fuse a frame set into one raster `upscale_factor` times larger than the
/// frames, using the default configuration.
pub fn reconstruct(frames: &FrameSet, upscale_factor: u32) -> Result<Raster> {
    reconstruct_with_config(frames, upscale_factor, &ReconstructionConfig::default())
}

pub fn reconstruct_with_config(
    frames: &FrameSet,
    upscale_factor: u32,
    config: &ReconstructionConfig,
) -> Result<Raster> {
    reconstruct_reported(frames, upscale_factor, config, &NoOpReporter)
}

/// Align, upscale, fuse and normalize with a progress reporter.
///
/// When `config.threads` is set, all stages run inside a dedicated Rayon pool
/// of that size; otherwise the global pool is used.
pub fn reconstruct_reported(
    frames: &FrameSet,
    upscale_factor: u32,
    config: &ReconstructionConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Raster> {
    if upscale_factor == 0 {
        return Err(SuperResError::InvalidUpscaleFactor(upscale_factor));
    }

    match config.threads {
        Some(0) => Err(SuperResError::Pipeline(
            "Thread count must be at least 1".into(),
        )),
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| run_stages(frames, upscale_factor, config, reporter))
        }
        None => run_stages(frames, upscale_factor, config, reporter),
    }
}

fn run_stages(
    frames: &FrameSet,
    factor: u32,
    config: &ReconstructionConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Raster> {
    let total = frames.len();
    info!(
        frames = total,
        width = frames.width(),
        height = frames.height(),
        factor,
        search_radius = config.alignment.search_radius,
        threads = rayon::current_num_threads(),
        "Starting reconstruction"
    );

    reporter.begin_stage(PipelineStage::Alignment, Some(total));
    let aligned = align_frames_with_progress(frames, &config.alignment, |done| {
        reporter.advance(done)
    })?;
    reporter.finish_stage();

    for (index, frame) in aligned.iter().enumerate().skip(1) {
        debug!(
            frame = index,
            dx = frame.offset.dx,
            dy = frame.offset.dy,
            "Frame aligned"
        );
    }
    let rasters: Vec<Raster> = aligned.into_iter().map(|a| a.raster).collect();

    reporter.begin_stage(PipelineStage::Fusion, Some(total));
    let accumulator = fuse_frames_with_progress(&rasters, factor, config.fusion, |done| {
        reporter.advance(done)
    })?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Normalization, None);
    let output = accumulator.normalize();
    reporter.finish_stage();

    info!(
        width = output.width(),
        height = output.height(),
        "Reconstruction complete"
    );
    Ok(output)
}

/// Load the configured inputs, reconstruct and write the result, reporting
/// progress through `reporter`.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<Raster> {
    reporter.begin_stage(PipelineStage::Reading, Some(config.inputs.len()));
    let frames = load_frame_set_with_progress(&config.inputs, |done| reporter.advance(done))?;
    reporter.finish_stage();

    let factor = match config.upscale_factor {
        Some(factor) => factor,
        None => {
            let factor = default_upscale_factor(frames.len());
            info!(factor, frames = frames.len(), "Upscale factor derived from frame count");
            factor
        }
    };

    let output = reconstruct_reported(&frames, factor, &config.reconstruction, reporter.as_ref())?;

    reporter.begin_stage(PipelineStage::Writing, None);
    save_raster(&output, &config.output, config.jpeg_quality)?;
    reporter.finish_stage();
    info!(output = %config.output.display(), "Output saved");

    Ok(output)
}

/// Run the full file-to-file pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<Raster> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}
