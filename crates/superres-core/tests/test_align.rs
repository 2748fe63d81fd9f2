mod common;

use superres_core::align::{
    align_frames, align_frames_with_progress, estimate_offsets, estimate_translation,
    shift_raster,
};
use superres_core::consts::ALIGN_PADDING_COLOR;
use superres_core::frame::{FrameSet, Offset, Raster};
use superres_core::pipeline::config::AlignmentConfig;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{gradient_raster, textured_raster};

#[test]
fn test_shift_moves_content_and_pads_black() {
    let r = Raster::from_fn(4, 3, |x, y| [x as u8 + 1, y as u8 + 1, 9]).unwrap();
    let shifted = shift_raster(&r, Offset::new(1, 0));
    for y in 0..3 {
        assert_eq!(shifted.pixel(0, y), ALIGN_PADDING_COLOR);
        for x in 1..4 {
            assert_eq!(shifted.pixel(x, y), r.pixel(x - 1, y));
        }
    }
}

#[test]
fn test_shift_negative_offset() {
    let r = Raster::from_fn(5, 5, |x, y| [x as u8 * 10, y as u8 * 10, 1]).unwrap();
    let shifted = shift_raster(&r, Offset::new(-2, -1));
    assert_eq!(shifted.pixel(0, 0), r.pixel(2, 1));
    assert_eq!(shifted.pixel(2, 3), r.pixel(4, 4));
    assert_eq!(shifted.pixel(3, 0), ALIGN_PADDING_COLOR);
    assert_eq!(shifted.pixel(0, 4), ALIGN_PADDING_COLOR);
}

#[test]
fn test_shift_out_of_frame_is_all_padding() {
    let r = textured_raster(4, 4);
    let shifted = shift_raster(&r, Offset::new(0, 7));
    assert_eq!(shifted, Raster::filled(4, 4, ALIGN_PADDING_COLOR).unwrap());
}

#[test]
fn test_zero_shift_is_identity() {
    let r = textured_raster(7, 5);
    assert_eq!(shift_raster(&r, Offset::ZERO), r);
}

#[test]
fn test_reference_is_unmodified() {
    let reference = textured_raster(16, 16);
    let other = shift_raster(&reference, Offset::new(2, 0));
    let frames = FrameSet::new(vec![reference.clone(), other]).unwrap();
    let aligned = align_frames(&frames, &AlignmentConfig::default()).unwrap();
    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned[0], reference);
}

#[test]
fn test_each_frame_warped_by_its_estimated_offset() {
    let reference = textured_raster(20, 20);
    let shifts = [(1, 0), (0, -2), (-3, 1), (2, 2), (-1, -1)];
    let mut frames = vec![reference.clone()];
    frames.extend(
        shifts
            .iter()
            .map(|&(dx, dy)| shift_raster(&reference, Offset::new(dx, dy))),
    );
    let set = FrameSet::new(frames.clone()).unwrap();
    let config = AlignmentConfig {
        search_radius: 4,
        ..Default::default()
    };

    let aligned = align_frames_with_progress(&set, &config, |_| {}).unwrap();
    assert_eq!(aligned.len(), frames.len());
    assert_eq!(aligned[0].offset, Offset::ZERO);

    for (i, &(dx, dy)) in shifts.iter().enumerate() {
        let frame = &aligned[i + 1];
        assert_eq!(frame.offset, Offset::new(dx, dy));
        assert_eq!(frame.raster, shift_raster(&frames[i + 1], frame.offset));
    }
}

#[test]
fn test_parallel_alignment_matches_pairwise_estimates() {
    let reference = gradient_raster(24, 18);
    let frames: Vec<Raster> = (0..6i32)
        .map(|i| shift_raster(&reference, Offset::new(i % 3 - 1, i / 3)))
        .collect();
    let set = FrameSet::new(frames.clone()).unwrap();
    let config = AlignmentConfig::default();

    let offsets = estimate_offsets(&set, &config).unwrap();
    assert_eq!(offsets[0], Offset::ZERO);
    for (i, frame) in frames.iter().enumerate().skip(1) {
        let expected = estimate_translation(&frames[0], frame, &config).unwrap();
        assert_eq!(offsets[i], expected);
    }
}

#[test]
fn test_progress_called_once_per_frame() {
    let reference = textured_raster(12, 12);
    let frames = FrameSet::new(vec![reference.clone(); 5]).unwrap();
    let calls = AtomicUsize::new(0);
    let max_done = AtomicUsize::new(0);
    align_frames_with_progress(&frames, &AlignmentConfig::default(), |done| {
        calls.fetch_add(1, Ordering::Relaxed);
        max_done.fetch_max(done, Ordering::Relaxed);
    })
    .unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 5);
    assert_eq!(max_done.load(Ordering::Relaxed), 5);
}
