use ndarray::s;

use crate::frame::{Offset, Raster};
use crate::pipeline::config::DifferenceNormalization;

/// Raw SSD accumulated over the overlap of a reference and a shifted candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlap {
    /// Sum of squared per-channel differences.
    pub sum: u64,
    /// Number of reference pixels compared.
    pub count: usize,
}

impl Overlap {
    /// Dissimilarity under the given normalization.
    ///
    /// An empty overlap is maximally dissimilar and scores `f64::INFINITY`.
    pub fn score(&self, normalization: DifferenceNormalization) -> f64 {
        if self.count == 0 {
            return f64::INFINITY;
        }
        match normalization {
            DifferenceNormalization::Sum => self.sum as f64,
            DifferenceNormalization::Mean => self.sum as f64 / self.count as f64,
        }
    }
}

/// Half-open range of reference coordinates `v` such that `v + shift` lies
/// inside `[0, candidate_len)`.
fn overlap_range(reference_len: usize, candidate_len: usize, shift: i32) -> (usize, usize) {
    let shift = shift as i64;
    let start = (-shift).max(0);
    let end = (reference_len as i64).min(candidate_len as i64 - shift);
    if end <= start {
        (0, 0)
    } else {
        (start as usize, end as usize)
    }
}

/// Accumulate the SSD between `reference(x, y)` and `candidate(x + dx, y + dy)`
/// over every pair where both pixels are in bounds.
///
/// Candidate coordinates that fall outside the candidate are skipped rather
/// than penalized.
pub fn squared_difference(reference: &Raster, candidate: &Raster, offset: Offset) -> Overlap {
    let (x0, x1) = overlap_range(reference.width(), candidate.width(), offset.dx);
    let (y0, y1) = overlap_range(reference.height(), candidate.height(), offset.dy);
    if x0 == x1 || y0 == y1 {
        return Overlap { sum: 0, count: 0 };
    }

    let cx0 = (x0 as i64 + offset.dx as i64) as usize;
    let cy0 = (y0 as i64 + offset.dy as i64) as usize;
    let (w, h) = (x1 - x0, y1 - y0);

    let ref_view = reference.data().slice(s![y0..y1, x0..x1, ..]);
    let cand_view = candidate.data().slice(s![cy0..cy0 + h, cx0..cx0 + w, ..]);

    let sum = ref_view
        .iter()
        .zip(cand_view.iter())
        .map(|(&a, &b)| {
            let d = a as i64 - b as i64;
            (d * d) as u64
        })
        .sum();

    Overlap { sum, count: w * h }
}

/// Dissimilarity between `reference` and `candidate` displaced by `offset`.
///
/// Always non-negative; `f64::INFINITY` when nothing overlaps.
pub fn difference(
    reference: &Raster,
    candidate: &Raster,
    offset: Offset,
    normalization: DifferenceNormalization,
) -> f64 {
    squared_difference(reference, candidate, offset).score(normalization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_range_positive_shift() {
        assert_eq!(overlap_range(10, 10, 3), (0, 7));
    }

    #[test]
    fn test_overlap_range_negative_shift() {
        assert_eq!(overlap_range(10, 10, -3), (3, 10));
    }

    #[test]
    fn test_overlap_range_disjoint() {
        assert_eq!(overlap_range(4, 4, 4), (0, 0));
        assert_eq!(overlap_range(4, 4, -9), (0, 0));
    }

    #[test]
    fn test_single_pixel_difference() {
        let a = Raster::filled(1, 1, [10, 20, 30]).unwrap();
        let b = Raster::filled(1, 1, [13, 16, 30]).unwrap();
        let overlap = squared_difference(&a, &b, Offset::ZERO);
        assert_eq!(overlap, Overlap { sum: 9 + 16, count: 1 });
    }

    #[test]
    fn test_empty_overlap_scores_infinity() {
        let overlap = Overlap { sum: 0, count: 0 };
        assert_eq!(overlap.score(DifferenceNormalization::Sum), f64::INFINITY);
        assert_eq!(overlap.score(DifferenceNormalization::Mean), f64::INFINITY);
    }
}
