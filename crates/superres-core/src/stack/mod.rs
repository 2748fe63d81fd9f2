pub mod accumulator;
pub mod fusion;

pub use accumulator::Accumulator;
pub use fusion::{fuse_frames, fuse_frames_with_progress};
