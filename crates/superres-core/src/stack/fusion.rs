use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_FRAME_THRESHOLD};
use crate::error::{Result, SuperResError};
use crate::frame::Raster;
use crate::pipeline::config::FusionStrategy;
use crate::upscale::upscale_bilinear;

use super::accumulator::Accumulator;

/// One canvas row of a [`RowLockedAccumulator`].
struct RowCells {
    sums: [Vec<f64>; COLOR_CHANNEL_COUNT],
    weights: Vec<u32>,
}

/// A single shared canvas whose rows are each guarded by their own lock.
///
/// Workers fusing different frames contend only when they touch the same row
/// at the same time.
struct RowLockedAccumulator {
    width: usize,
    rows: Vec<Mutex<RowCells>>,
}

impl RowLockedAccumulator {
    fn new(width: usize, height: usize) -> Self {
        let rows = (0..height)
            .map(|_| {
                Mutex::new(RowCells {
                    sums: std::array::from_fn(|_| vec![0.0; width]),
                    weights: vec![0; width],
                })
            })
            .collect();
        Self { width, rows }
    }

    fn add(&self, raster: &Raster) -> Result<()> {
        if raster.dimensions() != (self.width, self.rows.len()) {
            return Err(SuperResError::Pipeline(format!(
                "Cannot fuse a {}x{} raster into a {}x{} canvas",
                raster.width(),
                raster.height(),
                self.width,
                self.rows.len()
            )));
        }
        let data = raster.data();
        for (y, row) in self.rows.iter().enumerate() {
            let mut cells = row.lock();
            for x in 0..self.width {
                for ch in 0..COLOR_CHANNEL_COUNT {
                    cells.sums[ch][x] += data[[y, x, ch]] as f64;
                }
                cells.weights[x] += 1;
            }
        }
        Ok(())
    }

    fn into_accumulator(self) -> Result<Accumulator> {
        let mut acc = Accumulator::new(self.width, self.rows.len())?;
        for (y, row) in self.rows.into_iter().enumerate() {
            let cells = row.into_inner();
            acc.add_row(y, &cells.sums, &cells.weights);
        }
        Ok(acc)
    }
}

/// Split `frames` into one contiguous chunk per worker, fold each chunk into a
/// private canvas from `new_canvas`, then merge the partial canvases.
///
/// `new_canvas` runs once per chunk, so peak memory is bounded by the pool
/// size rather than the frame count.
fn reduce_in_chunks<N, T>(
    frames: &[Raster],
    factor: u32,
    new_canvas: N,
    tick: T,
) -> Result<Accumulator>
where
    N: Fn() -> Result<Accumulator> + Sync,
    T: Fn() + Sync,
{
    let chunk_len = frames.len().div_ceil(rayon::current_num_threads()).max(1);
    frames
        .par_chunks(chunk_len)
        .map(|chunk| -> Result<Accumulator> {
            let mut acc = new_canvas()?;
            for frame in chunk {
                acc.add(&upscale_bilinear(frame, factor)?)?;
                tick();
            }
            Ok(acc)
        })
        .try_reduce_with(|mut a, b| {
            a.merge(&b);
            Ok(a)
        })
        .unwrap_or_else(&new_canvas)
}

/// Upscale every aligned frame by `factor` and fuse it into one accumulator,
/// calling `on_frame_done` with the running count of fused frames.
///
/// The result does not depend on the order in which frames are fused: sums of
/// 8-bit samples are exact in `f64`.
pub fn fuse_frames_with_progress<F>(
    frames: &[Raster],
    factor: u32,
    strategy: FusionStrategy,
    on_frame_done: F,
) -> Result<Accumulator>
where
    F: Fn(usize) + Send + Sync,
{
    let Some(first) = frames.first() else {
        return Err(SuperResError::EmptySequence);
    };
    if factor == 0 {
        return Err(SuperResError::InvalidUpscaleFactor(factor));
    }
    let canvas_w = first.width() * factor as usize;
    let canvas_h = first.height() * factor as usize;
    let counter = AtomicUsize::new(0);
    let tick = || {
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done);
    };

    if frames.len() < PARALLEL_FRAME_THRESHOLD {
        let mut acc = Accumulator::new(canvas_w, canvas_h)?;
        for frame in frames {
            acc.add(&upscale_bilinear(frame, factor)?)?;
            tick();
        }
        return Ok(acc);
    }

    debug!(frames = frames.len(), %strategy, "Fusing frames in parallel");

    match strategy {
        FusionStrategy::Reduction => reduce_in_chunks(
            frames,
            factor,
            || Accumulator::new(canvas_w, canvas_h),
            tick,
        ),
        FusionStrategy::RowLocked => {
            let shared = RowLockedAccumulator::new(canvas_w, canvas_h);
            frames.par_iter().try_for_each(|frame| -> Result<()> {
                shared.add(&upscale_bilinear(frame, factor)?)?;
                tick();
                Ok(())
            })?;
            shared.into_accumulator()
        }
    }
}

pub fn fuse_frames(frames: &[Raster], factor: u32, strategy: FusionStrategy) -> Result<Accumulator> {
    fuse_frames_with_progress(frames, factor, strategy, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_locked_matches_sequential() {
        let a = Raster::from_fn(3, 2, |x, y| [x as u8 * 40, y as u8 * 90, 7]).unwrap();
        let b = Raster::filled(3, 2, [250, 1, 9]).unwrap();

        let shared = RowLockedAccumulator::new(3, 2);
        shared.add(&a).unwrap();
        shared.add(&b).unwrap();
        let locked = shared.into_accumulator().unwrap();

        let mut seq = Accumulator::new(3, 2).unwrap();
        seq.add(&a).unwrap();
        seq.add(&b).unwrap();

        assert_eq!(locked.weights(), seq.weights());
        for ch in 0..COLOR_CHANNEL_COUNT {
            assert_eq!(locked.channel_sums(ch), seq.channel_sums(ch));
        }
    }

    #[test]
    fn test_reduction_allocates_one_canvas_per_worker() {
        let frames: Vec<Raster> = (0..16u8)
            .map(|i| Raster::filled(8, 8, [i, 2 * i, 100]).unwrap())
            .collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();
        let allocated = AtomicUsize::new(0);
        let fused = AtomicUsize::new(0);

        let acc = pool
            .install(|| {
                reduce_in_chunks(
                    &frames,
                    2,
                    || {
                        allocated.fetch_add(1, Ordering::Relaxed);
                        Accumulator::new(16, 16)
                    },
                    || {
                        fused.fetch_add(1, Ordering::Relaxed);
                    },
                )
            })
            .unwrap();

        assert_eq!(allocated.load(Ordering::Relaxed), 4);
        assert_eq!(fused.load(Ordering::Relaxed), 16);
        assert!(acc.weights().iter().all(|&w| w == 16));
        let expected_red: f64 = (0..16u32).map(f64::from).sum();
        assert!(acc.channel_sums(0).iter().all(|&s| s == expected_red));
    }
}
