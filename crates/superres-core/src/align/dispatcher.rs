use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::Result;
use crate::frame::{FrameSet, Offset, Raster};
use crate::pipeline::config::AlignmentConfig;

use super::search::estimate_translation;
use super::shift::shift_raster;

/// A frame registered against the reference, with the offset that was applied.
#[derive(Clone, Debug)]
pub struct AlignedFrame {
    pub offset: Offset,
    pub raster: Raster,
}

fn align_one(reference: &Raster, frame: &Raster, config: &AlignmentConfig) -> Result<AlignedFrame> {
    let offset = estimate_translation(reference, frame, config)?;
    Ok(AlignedFrame {
        offset,
        raster: shift_raster(frame, offset),
    })
}

/// Run `per_frame` for every non-reference frame, in parallel when the set is
/// large enough, calling `on_frame_done` with the running count of finished
/// frames. The reference slot is filled by `reference_result`.
fn for_each_frame<T, R, P, F>(
    frames: &FrameSet,
    reference_result: R,
    per_frame: P,
    on_frame_done: F,
) -> Result<Vec<T>>
where
    T: Send,
    R: Fn(&Raster) -> T + Sync,
    P: Fn(&Raster, &Raster) -> Result<T> + Sync,
    F: Fn(usize) + Send + Sync,
{
    let reference = frames.reference();
    let counter = AtomicUsize::new(0);

    let run = |(i, frame): (usize, &Raster)| -> Result<T> {
        let result = if i == 0 {
            Ok(reference_result(frame))
        } else {
            per_frame(reference, frame)
        };
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done);
        result
    };

    if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames.frames().par_iter().enumerate().map(run).collect()
    } else {
        frames.frames().iter().enumerate().map(run).collect()
    }
}

/// Register every frame against frame 0 with progress reporting.
///
/// Element 0 of the result is the unmodified reference with a zero offset.
pub fn align_frames_with_progress<F>(
    frames: &FrameSet,
    config: &AlignmentConfig,
    on_frame_done: F,
) -> Result<Vec<AlignedFrame>>
where
    F: Fn(usize) + Send + Sync,
{
    for_each_frame(
        frames,
        |reference| AlignedFrame {
            offset: Offset::ZERO,
            raster: reference.clone(),
        },
        |reference, frame| align_one(reference, frame, config),
        on_frame_done,
    )
}

/// Register every frame against frame 0.
pub fn align_frames(frames: &FrameSet, config: &AlignmentConfig) -> Result<Vec<Raster>> {
    Ok(align_frames_with_progress(frames, config, |_| {})?
        .into_iter()
        .map(|aligned| aligned.raster)
        .collect())
}

/// Estimate the offset of every frame relative to frame 0 without warping.
pub fn estimate_offsets_with_progress<F>(
    frames: &FrameSet,
    config: &AlignmentConfig,
    on_frame_done: F,
) -> Result<Vec<Offset>>
where
    F: Fn(usize) + Send + Sync,
{
    for_each_frame(
        frames,
        |_| Offset::ZERO,
        |reference, frame| estimate_translation(reference, frame, config),
        on_frame_done,
    )
}

pub fn estimate_offsets(frames: &FrameSet, config: &AlignmentConfig) -> Result<Vec<Offset>> {
    estimate_offsets_with_progress(frames, config, |_| {})
}
