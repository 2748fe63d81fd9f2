use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayViewMut2, Axis};

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, SuperResError};
use crate::frame::Raster;

/// Source sample positions for one output coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap {
    lo: usize,
    hi: usize,
    /// Weight of `hi`; `lo` gets `1 - frac`.
    frac: f32,
}

/// Map each output coordinate back to the source grid.
///
/// Pixel centers line up: output coordinate `o` samples source position
/// `(o + 0.5) / factor - 0.5`, clamped to the first and last source pixel.
fn taps(src_len: usize, factor: u32) -> Vec<Tap> {
    let last = (src_len - 1) as f32;
    let scale = factor as f32;
    (0..src_len * factor as usize)
        .map(|o| {
            let pos = ((o as f32 + 0.5) / scale - 0.5).clamp(0.0, last);
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(src_len - 1);
            Tap {
                lo,
                hi,
                frac: pos - lo as f32,
            }
        })
        .collect()
}

fn fill_row(src: &Raster, ty: Tap, x_taps: &[Tap], mut row: ArrayViewMut2<u8>) {
    let data = src.data();
    for (ox, tx) in x_taps.iter().enumerate() {
        for ch in 0..COLOR_CHANNEL_COUNT {
            let p00 = data[[ty.lo, tx.lo, ch]] as f32;
            let p01 = data[[ty.lo, tx.hi, ch]] as f32;
            let p10 = data[[ty.hi, tx.lo, ch]] as f32;
            let p11 = data[[ty.hi, tx.hi, ch]] as f32;
            let top = p00 + (p01 - p00) * tx.frac;
            let bottom = p10 + (p11 - p10) * tx.frac;
            let v = top + (bottom - top) * ty.frac;
            row[[ox, ch]] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Resample a raster onto a canvas `factor` times larger in each dimension
/// using bilinear interpolation.
///
/// A factor of 1 returns an exact copy.
pub fn upscale_bilinear(raster: &Raster, factor: u32) -> Result<Raster> {
    if factor == 0 {
        return Err(SuperResError::InvalidUpscaleFactor(factor));
    }
    let (w, h) = raster.dimensions();
    if factor == 1 {
        return Ok(raster.clone());
    }

    let x_taps = taps(w, factor);
    let y_taps = taps(h, factor);
    let mut out = Array3::<u8>::zeros((y_taps.len(), x_taps.len(), COLOR_CHANNEL_COUNT));

    if x_taps.len() * y_taps.len() >= PARALLEL_PIXEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(oy, row)| fill_row(raster, y_taps[oy], &x_taps, row));
    } else {
        for (oy, row) in out.axis_iter_mut(Axis(0)).enumerate() {
            fill_row(raster, y_taps[oy], &x_taps, row);
        }
    }

    Ok(Raster::from_array_unchecked(out))
}
