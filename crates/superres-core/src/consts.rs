/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Minimum number of candidate offsets before the translation search is
/// spread across the thread pool. A radius of 2 gives 25 candidates.
pub const PARALLEL_CANDIDATE_THRESHOLD: usize = 25;

/// Default maximum shift (in pixels) searched in each direction.
pub const DEFAULT_SEARCH_RADIUS: u32 = 10;

/// Wide search radius for sequences with large hand-held drift.
/// Cost grows with the square of the radius.
pub const WIDE_SEARCH_RADIUS: u32 = 50;

/// Number of channels in a raster (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Fill color for pixels shifted in from outside the frame during alignment.
pub const ALIGN_PADDING_COLOR: [u8; COLOR_CHANNEL_COUNT] = [0, 0, 0];

/// Output color for canvas pixels that received no contributions.
pub const EMPTY_PIXEL_COLOR: [u8; COLOR_CHANNEL_COUNT] = [255, 255, 255];

/// Default JPEG encoder quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
