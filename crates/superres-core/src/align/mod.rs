mod dispatcher;
pub mod metric;
pub mod search;
pub mod shift;

pub use dispatcher::{
    align_frames, align_frames_with_progress, estimate_offsets, estimate_offsets_with_progress,
    AlignedFrame,
};
pub use metric::difference;
pub use search::estimate_translation;
pub use shift::shift_raster;
