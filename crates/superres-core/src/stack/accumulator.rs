use ndarray::{Array2, Array3, Axis, Zip};
use tracing::warn;

use crate::consts::{COLOR_CHANNEL_COUNT, EMPTY_PIXEL_COLOR};
use crate::error::{Result, SuperResError};
use crate::frame::Raster;

/// Per-pixel channel sums and contribution counts at canvas resolution.
#[derive(Clone, Debug)]
pub struct Accumulator {
    /// One sum plane per channel, shape = (height, width).
    sums: [Array2<f64>; COLOR_CHANNEL_COUNT],
    /// Number of frames that contributed to each pixel.
    weights: Array2<u32>,
}

impl Accumulator {
    /// An empty canvas. Both sides must be non-zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SuperResError::InvalidDimensions { width, height });
        }
        Ok(Self {
            sums: std::array::from_fn(|_| Array2::zeros((height, width))),
            weights: Array2::zeros((height, width)),
        })
    }

    pub fn width(&self) -> usize {
        self.weights.ncols()
    }

    pub fn height(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<u32> {
        &self.weights
    }

    pub fn channel_sums(&self, channel: usize) -> &Array2<f64> {
        &self.sums[channel]
    }

    /// Add a canvas-sized raster: every channel sample goes into its sum and
    /// every pixel's weight grows by one.
    pub fn add(&mut self, raster: &Raster) -> Result<()> {
        if raster.dimensions() != (self.width(), self.height()) {
            return Err(SuperResError::Pipeline(format!(
                "Cannot fuse a {}x{} raster into a {}x{} canvas",
                raster.width(),
                raster.height(),
                self.width(),
                self.height()
            )));
        }

        for (ch, sum) in self.sums.iter_mut().enumerate() {
            Zip::from(sum)
                .and(raster.data().index_axis(Axis(2), ch))
                .for_each(|s, &v| *s += v as f64);
        }
        self.weights.mapv_inplace(|w| w + 1);
        Ok(())
    }

    /// Merge another accumulator into this one (for parallel frame processing).
    pub fn merge(&mut self, other: &Accumulator) {
        for (sum, other_sum) in self.sums.iter_mut().zip(other.sums.iter()) {
            *sum += other_sum;
        }
        self.weights += &other.weights;
    }

    pub(crate) fn add_row(&mut self, row: usize, sums: &[Vec<f64>; COLOR_CHANNEL_COUNT], weights: &[u32]) {
        for (ch, plane) in self.sums.iter_mut().enumerate() {
            for (dst, &src) in plane.row_mut(row).iter_mut().zip(sums[ch].iter()) {
                *dst += src;
            }
        }
        for (dst, &src) in self.weights.row_mut(row).iter_mut().zip(weights.iter()) {
            *dst += src;
        }
    }

    /// Divide sums by weights and produce the output raster.
    ///
    /// Pixels with a positive weight become `round(sum / weight)` clamped to
    /// `[0, 255]`; pixels that received nothing become [`EMPTY_PIXEL_COLOR`].
    pub fn normalize(&self) -> Raster {
        let (h, w) = self.weights.dim();
        let mut out = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
        let mut empty: usize = 0;

        for ((y, x), &weight) in self.weights.indexed_iter() {
            if weight > 0 {
                let weight = weight as f64;
                for ch in 0..COLOR_CHANNEL_COUNT {
                    let v = (self.sums[ch][[y, x]] / weight).round().clamp(0.0, 255.0);
                    out[[y, x, ch]] = v as u8;
                }
            } else {
                for (ch, &v) in EMPTY_PIXEL_COLOR.iter().enumerate() {
                    out[[y, x, ch]] = v;
                }
                empty += 1;
            }
        }

        if empty > 0 {
            warn!(pixels = empty, "Canvas pixels received no contributions");
        }

        Raster::from_array_unchecked(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accumulator_is_empty() {
        let acc = Accumulator::new(3, 2).unwrap();
        assert_eq!(acc.width(), 3);
        assert_eq!(acc.height(), 2);
        assert!(acc.weights().iter().all(|&w| w == 0));
    }

    #[test]
    fn test_empty_canvas_normalizes_to_white() {
        let acc = Accumulator::new(2, 2).unwrap();
        assert_eq!(acc.normalize(), Raster::filled(2, 2, EMPTY_PIXEL_COLOR).unwrap());
    }

    #[test]
    fn test_normalize_rounds_half_away_from_zero() {
        let mut acc = Accumulator::new(1, 1).unwrap();
        acc.add(&Raster::filled(1, 1, [0, 1, 254]).unwrap()).unwrap();
        acc.add(&Raster::filled(1, 1, [1, 2, 255]).unwrap()).unwrap();
        // 0.5 -> 1, 1.5 -> 2, 254.5 -> 255
        assert_eq!(acc.normalize().pixel(0, 0), [1, 2, 255]);
    }

    #[test]
    fn test_zero_sized_canvas_rejected() {
        assert!(matches!(
            Accumulator::new(0, 3),
            Err(SuperResError::InvalidDimensions { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_add_rejects_wrong_size() {
        let mut acc = Accumulator::new(4, 4).unwrap();
        assert!(acc.add(&Raster::filled(2, 2, [0, 0, 0]).unwrap()).is_err());
    }
}
