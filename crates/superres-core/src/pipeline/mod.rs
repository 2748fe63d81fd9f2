pub mod config;
mod helpers;
mod orchestrator;
mod types;

pub use helpers::default_upscale_factor;
pub use orchestrator::{
    reconstruct, reconstruct_reported, reconstruct_with_config, run_pipeline,
    run_pipeline_reported,
};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter};
