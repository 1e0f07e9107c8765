//! Ames Stereo Pipeline driver module
//!
//! Builds argument vectors for the ASP tools (cam_gen, bundle_adjust,
//! parallel_stereo, point2dem, dem_mosaic, pc_align), runs them through a
//! [`CommandRunner`] and locates their outputs by ASP's file naming
//! conventions.

mod command;
mod subprocess_runner;
mod pipeline;
mod stereo_pairs;
pub mod fs;
pub mod types;


pub use command::{CommandRunner, ToolCall};
pub use subprocess_runner::SubprocessRunner;
pub use pipeline::AspPipeline;
pub use stereo_pairs::parse_match_file_name;
pub use types::{
    CameraRequest, PairReport, PairState, PipelineConfig, PipelineConfigBuilder, PipelineJob,
    PipelineOutputs, StereoPair,
};
