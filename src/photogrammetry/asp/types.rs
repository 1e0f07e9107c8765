//! Pipeline configuration and stage data types

use std::path::PathBuf;

use crate::photogrammetry::corners::Heading;
use crate::photogrammetry::geodesy::CameraCenter;

/// Projection point2dem grids into unless told otherwise (UTM zone 10N)
pub const DEFAULT_TARGET_SRS: &str = "+proj=utm +zone=10 +datum=WGS84 +units=m +no_defs";

/// Configuration for the ASP pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Spacing between scanned pixels on the film in millimetres
    pub pixel_pitch_mm: f64,
    /// Value passed to cam_gen `--pixel-pitch` (focal length and optical
    /// center are already expressed in pixels)
    pub scale: f64,
    /// Nominal flying height above ground used to size frame footprints
    pub altitude_m: f64,
    /// Extension of the scanned images, without dot
    pub image_extension: String,
    /// Extension of the pinhole camera files, without dot
    pub camera_extension: String,
    /// PROJ string handed to point2dem `--t_srs`
    pub target_srs: String,
    /// Directory holding the ASP executables; `PATH` is searched when unset
    pub asp_bin_directory: Option<PathBuf>,
    /// Log every external call at info level instead of debug
    pub print_calls: bool,
    /// Echo tool output to the terminal
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pixel_pitch_mm: 0.02,
            scale: 1.0,
            altitude_m: 1500.0,
            image_extension: "tif".to_string(),
            camera_extension: "tsai".to_string(),
            target_srs: DEFAULT_TARGET_SRS.to_string(),
            asp_bin_directory: None,
            print_calls: false,
            verbose: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    pixel_pitch_mm: Option<f64>,
    scale: Option<f64>,
    altitude_m: Option<f64>,
    image_extension: Option<String>,
    camera_extension: Option<String>,
    target_srs: Option<String>,
    asp_bin_directory: Option<Option<PathBuf>>,
    print_calls: Option<bool>,
    verbose: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn pixel_pitch_mm(mut self, pitch: f64) -> Self {
        self.pixel_pitch_mm = Some(pitch);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn altitude_m(mut self, altitude: f64) -> Self {
        self.altitude_m = Some(altitude);
        self
    }

    pub fn image_extension(mut self, extension: impl Into<String>) -> Self {
        self.image_extension = Some(extension.into());
        self
    }

    pub fn camera_extension(mut self, extension: impl Into<String>) -> Self {
        self.camera_extension = Some(extension.into());
        self
    }

    pub fn target_srs(mut self, srs: impl Into<String>) -> Self {
        self.target_srs = Some(srs.into());
        self
    }

    pub fn asp_bin_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.asp_bin_directory = Some(directory);
        self
    }

    pub fn print_calls(mut self, enable: bool) -> Self {
        self.print_calls = Some(enable);
        self
    }

    pub fn verbose(mut self, enable: bool) -> Self {
        self.verbose = Some(enable);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            pixel_pitch_mm: self.pixel_pitch_mm.unwrap_or(default.pixel_pitch_mm),
            scale: self.scale.unwrap_or(default.scale),
            altitude_m: self.altitude_m.unwrap_or(default.altitude_m),
            image_extension: self.image_extension.unwrap_or(default.image_extension),
            camera_extension: self.camera_extension.unwrap_or(default.camera_extension),
            target_srs: self.target_srs.unwrap_or(default.target_srs),
            asp_bin_directory: self.asp_bin_directory.unwrap_or(default.asp_bin_directory),
            print_calls: self.print_calls.unwrap_or(default.print_calls),
            verbose: self.verbose.unwrap_or(default.verbose),
        }
    }
}

/// Everything cam_gen needs to synthesise one frame's camera
#[derive(Debug, Clone)]
pub struct CameraRequest {
    pub image: PathBuf,
    pub center: CameraCenter,
    pub heading: Heading,
    pub focal_length_mm: f64,
    pub reference_dem: PathBuf,
    /// Precomputed `--lon-lat-values`; skips corner synthesis when set
    pub corner_coordinates: Option<String>,
}

/// Two frames that share a match file, with their inputs and stereo prefix
#[derive(Debug, Clone, PartialEq)]
pub struct StereoPair {
    pub frame_a: String,
    pub frame_b: String,
    pub match_file: PathBuf,
    pub image_a: PathBuf,
    pub image_b: PathBuf,
    pub camera_a: PathBuf,
    pub camera_b: PathBuf,
    /// `<stereo dir>/A__B/run`
    pub output_prefix: PathBuf,
}

impl StereoPair {
    /// Conventional `A__B` directory name
    pub fn name(&self) -> String {
        format!("{}__{}", self.frame_a, self.frame_b)
    }
}

/// Progress of one pair through stereo and gridding
#[derive(Debug, Clone, PartialEq)]
pub enum PairState {
    Discovered,
    StereoRunning,
    StereoDone,
    /// parallel_stereo failed; the pair has no point cloud
    StereoFailed(String),
    GriddingRunning,
    /// Per-pair DEM written
    Gridded(PathBuf),
    /// No DEM could be produced; the reason is kept for the operator
    GriddingFailed(String),
}

impl PairState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PairState::StereoFailed(_) | PairState::Gridded(_) | PairState::GriddingFailed(_)
        )
    }
}

/// Terminal outcome of one stereo pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairReport {
    pub pair: StereoPair,
    pub state: PairState,
}

/// Inputs of an end-to-end run, from scanned frames to an aligned DEM
#[derive(Debug, Clone)]
pub struct PipelineJob {
    pub frames: Vec<CameraRequest>,
    pub image_directory: PathBuf,
    pub reference_dem: PathBuf,
    /// Receives `cameras/`, `ba/`, `stereo/`, `mosaic/` and `align/`
    pub work_directory: PathBuf,
}

/// Artifacts of an end-to-end run
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub cameras: Vec<PathBuf>,
    pub bundle_adjust_directory: PathBuf,
    pub pairs: Vec<PairReport>,
    pub mosaic: PathBuf,
    pub aligned_dem: PathBuf,
}
