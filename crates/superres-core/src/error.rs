use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuperResError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error(
        "Unsupported format for file {path:?}. Supported formats are: JPEG, PNG, GIF ({source})"
    )]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Frame {index} is {actual:?}, expected {expected:?} to match the reference")]
    DimensionMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid upscale factor: {0} (must be at least 1)")]
    InvalidUpscaleFactor(u32),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, SuperResError>;
