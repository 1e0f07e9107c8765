use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::photogrammetry::{
    asp::{
        command::{CommandRunner, ToolCall},
        fs::{create_dir, list_files_with_extension, parent_directory, require_file, split_file},
        subprocess_runner::SubprocessRunner,
        types::{CameraRequest, PipelineConfig, PipelineJob, PipelineOutputs},
    },
    common::error::{PipelineError, Result},
    corners::corner_coordinates_string,
    frame::FrameSpec,
    raster::{RasterReader, TiffRasterReader},
};

/// Name of the per-pair DEM written by point2dem from `run-PC.tif`
pub(crate) const PAIR_DEM_FILE_NAME: &str = "run-DEM.tif";

pub struct AspPipeline<C: CommandRunner, R: RasterReader> {
    runner: C,
    raster_reader: R,
    config: PipelineConfig,
}

impl AspPipeline<SubprocessRunner, TiffRasterReader> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            runner: SubprocessRunner::new(config.verbose),
            raster_reader: TiffRasterReader,
            config,
        }
    }
}

impl<C: CommandRunner, R: RasterReader> AspPipeline<C, R> {
    pub fn with_custom(runner: C, raster_reader: R, config: PipelineConfig) -> Self {
        Self {
            runner,
            raster_reader,
            config,
        }
    }

    pub(crate) fn program(&self, tool: &str) -> String {
        match &self.config.asp_bin_directory {
            Some(directory) => directory.join(tool).to_string_lossy().into_owned(),
            None => tool.to_string(),
        }
    }

    pub(crate) fn dispatch(&self, call: ToolCall) -> Result<()> {
        if self.config.print_calls {
            info!("{}", call);
        } else {
            debug!("{}", call);
        }
        self.runner.run(&call)
    }

    /// Synthesises a pinhole camera for one scanned frame with cam_gen.
    ///
    /// Returns `<output_directory>/<image stem>.<camera extension>`.
    #[instrument(skip(self, request), fields(image = %request.image.display()))]
    pub fn generate_camera(&self, request: &CameraRequest, output_directory: &Path) -> Result<PathBuf> {
        let (_, stem, _) = split_file(&request.image)?;
        require_file(&request.reference_dem)?;

        let size = self.raster_reader.read_size(&request.image)?;
        let frame = FrameSpec::new(
            request.focal_length_mm,
            self.config.pixel_pitch_mm,
            size.width,
            size.height,
        );
        frame.validate()?;
        let (cx, cy) = frame.principal_point_px();

        let corners = match &request.corner_coordinates {
            Some(corners) => corners.clone(),
            None => corner_coordinates_string(
                request.center,
                &frame,
                request.heading,
                self.config.altitude_m,
            )?,
        };

        create_dir(&output_directory.join("log"))?;
        let camera = output_directory.join(format!("{}.{}", stem, self.config.camera_extension));

        let call = ToolCall::new(self.program("cam_gen"))
            .path(&request.image)
            .arg("--reference-dem")
            .path(&request.reference_dem)
            .arg("--focal-length")
            .arg(frame.focal_length_px().to_string())
            .arg("--optical-center")
            .args([cx.to_string(), cy.to_string()])
            .arg("--pixel-pitch")
            .arg(self.config.scale.to_string())
            .arg("--refine-camera")
            .arg("-o")
            .path(&camera)
            .arg("--lon-lat-values")
            .arg(corners)
            .log_to(output_directory.join("log"));
        self.dispatch(call)?;

        info!("Camera written to {}", camera.display());
        Ok(camera)
    }

    /// Runs [`Self::generate_camera`] for each frame, in order.
    pub fn generate_cameras(
        &self,
        requests: &[CameraRequest],
        output_directory: &Path,
    ) -> Result<Vec<PathBuf>> {
        requests
            .iter()
            .map(|request| self.generate_camera(request, output_directory))
            .collect()
    }

    /// Bundle adjusts every image in `image_directory` against its camera in
    /// `camera_directory`. Returns the directory of `output_prefix`.
    #[instrument(skip(self, image_directory, camera_directory, output_prefix))]
    pub fn bundle_adjust(
        &self,
        image_directory: &Path,
        camera_directory: &Path,
        output_prefix: &Path,
    ) -> Result<PathBuf> {
        let images = list_files_with_extension(image_directory, &self.config.image_extension)?;
        if images.is_empty() {
            return Err(PipelineError::MissingInput(
                image_directory.join(format!("*.{}", self.config.image_extension)),
            ));
        }

        let mut cameras = Vec::with_capacity(images.len());
        for image in &images {
            let (_, stem, _) = split_file(image)?;
            let camera = camera_directory.join(format!("{}.{}", stem, self.config.camera_extension));
            require_file(&camera)?;
            cameras.push(camera);
        }

        let ba_directory = parent_directory(output_prefix);
        let log_directory = ba_directory.join("log");
        create_dir(&log_directory)?;

        let call = ToolCall::new(self.program("bundle_adjust"))
            .args(["--threads", "1"])
            .arg("--disable-tri-ip-filter")
            .arg("--force-reuse-match-files")
            .arg("--skip-rough-homography")
            .args(["-t", "nadirpinhole"])
            .args(["--ip-inlier-factor", "1"])
            .args(["--ip-uniqueness-threshold", "0.9"])
            .args(["--ip-per-tile", "4000"])
            .args(["--datum", "wgs84"])
            .arg("--inline-adjustments")
            .args(["--camera-weight", "0.0"])
            .args(["--num-iterations", "500"])
            .args(["--num-passes", "3"])
            .paths(&images)
            .paths(&cameras)
            .arg("-o")
            .path(output_prefix)
            .log_to(log_directory);
        self.dispatch(call)?;

        info!("Bundle adjust results saved in {}", ba_directory.display());
        Ok(ba_directory)
    }

    /// Runs parallel_stereo on one pair. Returns the directory of `output_prefix`.
    #[instrument(skip_all, fields(prefix = %output_prefix.display()))]
    pub fn parallel_stereo(
        &self,
        image_a: &Path,
        image_b: &Path,
        camera_a: &Path,
        camera_b: &Path,
        output_prefix: &Path,
    ) -> Result<PathBuf> {
        let stereo_directory = parent_directory(output_prefix);
        let log_directory = stereo_directory.join("log");
        create_dir(&log_directory)?;

        let call = ToolCall::new(self.program("parallel_stereo"))
            .arg("--force-reuse-match-files")
            .args(["--stereo-algorithm", "2"])
            .args(["-t", "nadirpinhole"])
            .arg("--skip-rough-homography")
            .args(["--ip-inlier-factor", "1"])
            .args(["--ip-per-tile", "2000"])
            .args(["--ip-uniqueness-threshold", "0.9"])
            .arg("--ip-debug-images")
            .path(image_a)
            .path(image_b)
            .path(camera_a)
            .path(camera_b)
            .path(output_prefix)
            .log_to(log_directory);
        self.dispatch(call)?;

        info!("Parallel stereo results saved in {}", stereo_directory.display());
        Ok(stereo_directory)
    }

    /// Grids a point cloud into the configured projection.
    pub fn point2dem(&self, point_cloud: &Path) -> Result<PathBuf> {
        self.point2dem_with_srs(point_cloud, &self.config.target_srs)
    }

    /// Grids a point cloud into `target_srs` and returns the DEM path:
    /// `run-PC.tif` becomes `run-DEM.tif`, any other `<stem>.tif` becomes
    /// `<stem>-DEM.tif`.
    #[instrument(skip(self, point_cloud), fields(point_cloud = %point_cloud.display()))]
    pub fn point2dem_with_srs(&self, point_cloud: &Path, target_srs: &str) -> Result<PathBuf> {
        require_file(point_cloud)?;
        let (directory, stem, extension) = split_file(point_cloud)?;

        let call = ToolCall::new(self.program("point2dem"))
            .arg("--t_srs")
            .arg(target_srs)
            .arg("--errorimage")
            .path(point_cloud)
            .log_to(directory.join("log"));
        self.dispatch(call)?;

        let dem_stem = stem.strip_suffix("-PC").unwrap_or(&stem);
        let dem = directory.join(format!("{dem_stem}-DEM{extension}"));
        info!("DEM written to {}", dem.display());
        Ok(dem)
    }

    /// Mosaics the per-pair DEMs found one level below `stereo_parent`.
    #[instrument(skip_all, fields(output = %output_file.display()))]
    pub fn dem_mosaic(&self, stereo_parent: &Path, output_file: &Path) -> Result<PathBuf> {
        if !stereo_parent.is_dir() {
            return Err(PipelineError::MissingInput(stereo_parent.to_path_buf()));
        }

        let mut dems = Vec::new();
        for entry in std::fs::read_dir(stereo_parent)? {
            let dem = entry?.path().join(PAIR_DEM_FILE_NAME);
            if dem.is_file() {
                dems.push(dem);
            }
        }
        dems.sort();
        if dems.is_empty() {
            return Err(PipelineError::MissingInput(
                stereo_parent.join("*").join(PAIR_DEM_FILE_NAME),
            ));
        }

        let output_directory = parent_directory(output_file);
        let log_directory = output_directory.join("log");
        create_dir(&log_directory)?;

        info!("Mosaicing {} DEMs", dems.len());
        let call = ToolCall::new(self.program("dem_mosaic"))
            .paths(&dems)
            .arg("-o")
            .path(output_file)
            .log_to(log_directory);
        self.dispatch(call)?;

        Ok(output_file.to_path_buf())
    }

    /// Aligns `input_dem` to `reference_dem` with pc_align and grids the
    /// transformed source points. Returns `<prefix>-trans_source-DEM.tif`.
    #[instrument(skip_all, fields(input = %input_dem.display()))]
    pub fn pc_align(
        &self,
        input_dem: &Path,
        reference_dem: &Path,
        output_prefix: &Path,
    ) -> Result<PathBuf> {
        require_file(input_dem)?;
        require_file(reference_dem)?;

        let output_directory = parent_directory(output_prefix);
        let log_directory = output_directory.join("log");
        create_dir(&log_directory)?;

        let call = ToolCall::new(self.program("pc_align"))
            .arg("--save-transformed-source-points")
            .args(["--max-displacement", "-1"])
            .path(reference_dem)
            .path(input_dem)
            .args(["--alignment-method", "similarity-point-to-point"])
            .arg("-o")
            .path(output_prefix)
            .log_to(log_directory);
        self.dispatch(call)?;

        let mut transformed = output_prefix.as_os_str().to_owned();
        transformed.push("-trans_source.tif");
        self.point2dem(Path::new(&transformed))
    }

    /// Full sequence: cameras, bundle adjustment, pairwise stereo and
    /// gridding, mosaic, then alignment to the reference DEM.
    #[instrument(skip_all, fields(work = %job.work_directory.display()))]
    pub fn run(&self, job: &PipelineJob) -> Result<PipelineOutputs> {
        let work = &job.work_directory;
        let camera_directory = work.join("cameras");
        let stereo_directory = work.join("stereo");

        info!("Generating {} cameras", job.frames.len());
        let cameras = self.generate_cameras(&job.frames, &camera_directory)?;

        let ba_directory =
            self.bundle_adjust(&job.image_directory, &camera_directory, &work.join("ba").join("run"))?;

        // bundle_adjust writes the adjusted cameras and the match files next
        // to each other
        let pairs = self.iter_stereo_pairs(
            &ba_directory,
            &job.image_directory,
            &ba_directory,
            &stereo_directory,
        )?;

        let mosaic =
            self.dem_mosaic(&stereo_directory, &work.join("mosaic").join("run-DEM-mosaic.tif"))?;
        let aligned_dem =
            self.pc_align(&mosaic, &job.reference_dem, &work.join("align").join("run"))?;

        info!("Aligned DEM written to {}", aligned_dem.display());
        Ok(PipelineOutputs {
            cameras,
            bundle_adjust_directory: ba_directory,
            pairs,
            mosaic,
            aligned_dem,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
