mod common;

use superres_core::error::SuperResError;
use superres_core::frame::Raster;
use superres_core::upscale::upscale_bilinear;

use common::{gray_raster, textured_raster};

#[test]
fn test_factor_one_is_identity() {
    let r = textured_raster(9, 7);
    assert_eq!(upscale_bilinear(&r, 1).unwrap(), r);
}

#[test]
fn test_output_dimensions() {
    let r = textured_raster(5, 3);
    for factor in 1..=4u32 {
        let up = upscale_bilinear(&r, factor).unwrap();
        assert_eq!(up.dimensions(), (5 * factor as usize, 3 * factor as usize));
    }
}

#[test]
fn test_zero_factor_rejected() {
    let r = gray_raster(2, 2, 10);
    assert!(matches!(
        upscale_bilinear(&r, 0),
        Err(SuperResError::InvalidUpscaleFactor(0))
    ));
}

#[test]
fn test_constant_stays_constant() {
    let r = gray_raster(3, 4, 77);
    let up = upscale_bilinear(&r, 3).unwrap();
    assert_eq!(up, gray_raster(9, 12, 77));
}

#[test]
fn test_horizontal_ramp_with_clamped_edges() {
    let r = Raster::from_fn(2, 1, |x, _| if x == 0 { [0, 0, 0] } else { [200, 200, 200] })
        .unwrap();
    let up = upscale_bilinear(&r, 4).unwrap();
    let row: Vec<u8> = (0..8).map(|x| up.pixel(x, 0)[0]).collect();
    assert_eq!(row, vec![0, 0, 25, 75, 125, 175, 200, 200]);
    // Every output row matches since the source has a single row.
    for y in 0..4 {
        assert_eq!(up.pixel(3, y), [75, 75, 75]);
    }
}

#[test]
fn test_monotone_between_samples() {
    let r = Raster::from_fn(4, 1, |x, _| {
        let v = [10, 60, 61, 250][x];
        [v, 255 - v, v]
    })
    .unwrap();
    let up = upscale_bilinear(&r, 5).unwrap();
    let red: Vec<u8> = (0..20).map(|x| up.pixel(x, 0)[0]).collect();
    let green: Vec<u8> = (0..20).map(|x| up.pixel(x, 0)[1]).collect();
    assert!(red.windows(2).all(|w| w[0] <= w[1]), "red not monotone: {red:?}");
    assert!(green.windows(2).all(|w| w[0] >= w[1]), "green not monotone: {green:?}");
}

#[test]
fn test_large_canvas_uses_row_parallel_path() {
    // 128x128 source at 3x exceeds the parallel pixel threshold.
    let r = gray_raster(128, 128, 33);
    let up = upscale_bilinear(&r, 3).unwrap();
    assert_eq!(up.dimensions(), (384, 384));
    assert!(up.data().iter().all(|&v| v == 33));
}
