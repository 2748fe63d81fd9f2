use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_JPEG_QUALITY, DEFAULT_SEARCH_RADIUS};

/// How the squared-difference sum is turned into an alignment score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifferenceNormalization {
    /// Raw sum over the overlap.
    #[default]
    Sum,
    /// Sum divided by the number of compared pixels.
    Mean,
}

impl std::fmt::Display for DifferenceNormalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sum => write!(f, "Sum"),
            Self::Mean => write!(f, "Mean"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Maximum shift (pixels) searched in each direction.
    #[serde(default = "default_search_radius")]
    pub search_radius: u32,
    #[serde(default)]
    pub normalization: DifferenceNormalization,
}

fn default_search_radius() -> u32 {
    DEFAULT_SEARCH_RADIUS
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            normalization: DifferenceNormalization::default(),
        }
    }
}

/// Synchronization discipline for fusing frames concurrently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionStrategy {
    /// Each worker owns a private canvas; canvases are summed at the end.
    #[default]
    Reduction,
    /// One shared canvas with a lock per row.
    RowLocked,
}

impl std::fmt::Display for FusionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reduction => write!(f, "Reduction"),
            Self::RowLocked => write!(f, "Row Locked"),
        }
    }
}

/// Parameters of a single reconstruction call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub fusion: FusionStrategy,
    /// Worker threads; `None` uses the global Rayon pool.
    #[serde(default)]
    pub threads: Option<usize>,
}

/// A full file-to-file run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input frames; the first one is the reference.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Canvas scale. `None` derives it from the frame count.
    #[serde(default)]
    pub upscale_factor: Option<u32>,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("result.jpg"),
            upscale_factor: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            reconstruction: ReconstructionConfig::default(),
        }
    }
}
