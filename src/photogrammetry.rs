//! Photogrammetry pipeline module
//!
//! Turns scanned historical aerial frames into aligned DEMs by driving the
//! Ames Stereo Pipeline. Camera synthesis geometry lives in `geodesy`,
//! `frame` and `corners`; `asp` assembles and runs the external tools.

pub mod common;
pub mod geodesy;
pub mod frame;
pub mod corners;
pub mod raster;
pub mod asp;

pub use common::{
    PipelineError,
    Result,
};

pub use geodesy::{
    CameraCenter,
    GeoPoint,
    ProjectedPoint,
    UtmZone,
    from_local_projection,
    to_local_projection,
};

pub use frame::{
    FrameSpec,
    GroundExtents,
    ground_half_extents,
};

pub use corners::{
    Corner,
    CornerQuad,
    Heading,
    corner_coordinates_string,
    rotate_corners,
};

pub use raster::{
    RasterReader,
    RasterSize,
    TiffRasterReader,
};

pub use asp::{
    AspPipeline,
    CameraRequest,
    CommandRunner,
    PairReport,
    PairState,
    PipelineConfig,
    PipelineConfigBuilder,
    PipelineJob,
    PipelineOutputs,
    StereoPair,
    SubprocessRunner,
    ToolCall,
    parse_match_file_name,
};
