use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_CANDIDATE_THRESHOLD;
use crate::error::{Result, SuperResError};
use crate::frame::{Offset, Raster};
use crate::pipeline::config::AlignmentConfig;

use super::metric::squared_difference;

/// One evaluated point of the search window.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    offset: Offset,
    score: f64,
    overlap: usize,
    /// Position in dy-major, dx-minor scan order.
    scan_index: usize,
}

/// Pick the preferred of two candidates.
///
/// Lower score wins. Equal scores prefer the larger overlap, then the earlier
/// scan position, so unlike a plain first-in-scan-order rule a featureless
/// frame settles on the widest overlap rather than a corner of the window.
/// This is a total order, so the parallel reduction returns the same winner
/// regardless of how the grid was split.
fn prefer(a: Candidate, b: Candidate) -> Candidate {
    let ord = a
        .score
        .total_cmp(&b.score)
        .then_with(|| b.overlap.cmp(&a.overlap))
        .then_with(|| a.scan_index.cmp(&b.scan_index));
    if ord.is_le() {
        a
    } else {
        b
    }
}

/// Largest radius that can still produce a non-empty overlap.
fn effective_radius(reference: &Raster, candidate: &Raster, radius: u32) -> i64 {
    let limit = reference
        .width()
        .max(reference.height())
        .max(candidate.width())
        .max(candidate.height()) as i64;
    (radius as i64).min(limit)
}

/// Find the integer offset in `[-r, r] x [-r, r]` that minimizes the
/// difference metric between `reference` and `candidate`.
///
/// Every offset in the window is evaluated. Offsets beyond the raster size
/// cannot overlap and are left out of the window, which never changes the
/// result since `(0, 0)` always overlaps.
pub fn estimate_translation(
    reference: &Raster,
    candidate: &Raster,
    config: &AlignmentConfig,
) -> Result<Offset> {
    let radius = effective_radius(reference, candidate, config.search_radius);
    let side = (2 * radius + 1) as usize;
    let total = side * side;
    let normalization = config.normalization;

    let evaluate = |scan_index: usize| -> Candidate {
        let dy = (scan_index / side) as i64 - radius;
        let dx = (scan_index % side) as i64 - radius;
        let offset = Offset::new(dx as i32, dy as i32);
        let overlap = squared_difference(reference, candidate, offset);
        Candidate {
            offset,
            score: overlap.score(normalization),
            overlap: overlap.count,
            scan_index,
        }
    };

    let best = if total >= PARALLEL_CANDIDATE_THRESHOLD {
        (0..total).into_par_iter().map(evaluate).reduce_with(prefer)
    } else {
        (0..total).map(evaluate).reduce(prefer)
    }
    .ok_or_else(|| SuperResError::Pipeline("Empty search window".into()))?;

    debug!(
        dx = best.offset.dx,
        dy = best.offset.dy,
        score = best.score,
        candidates = total,
        "Translation estimated"
    );

    Ok(best.offset)
}
