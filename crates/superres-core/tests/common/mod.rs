#![allow(dead_code)]

use superres_core::frame::Raster;

/// Deterministic per-pixel noise in `[0, 255]`.
pub fn noise(x: usize, y: usize, ch: usize) -> u8 {
    let mut v = (x as u32).wrapping_mul(2_654_435_761)
        ^ (y as u32).wrapping_mul(2_246_822_519)
        ^ (ch as u32).wrapping_mul(3_266_489_917);
    v ^= v >> 15;
    v = v.wrapping_mul(2_246_822_519);
    v ^= v >> 13;
    (v & 0xff) as u8
}

/// A raster filled with deterministic noise, so every offset but the true one
/// has a positive difference.
pub fn textured_raster(width: usize, height: usize) -> Raster {
    Raster::from_fn(width, height, |x, y| [noise(x, y, 0), noise(x, y, 1), noise(x, y, 2)])
        .unwrap()
}

/// A smooth horizontal/vertical gradient.
pub fn gradient_raster(width: usize, height: usize) -> Raster {
    let wx = width.saturating_sub(1).max(1);
    let hy = height.saturating_sub(1).max(1);
    Raster::from_fn(width, height, |x, y| [(x * 255 / wx) as u8, (y * 255 / hy) as u8, 128])
        .unwrap()
}

pub fn gray_raster(width: usize, height: usize, level: u8) -> Raster {
    Raster::filled(width, height, [level, level, level]).unwrap()
}
