//! Stereo pair discovery from bundle_adjust match files, and the per-pair
//! stereo + gridding loop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::photogrammetry::{
    asp::{
        command::CommandRunner,
        fs::{list_files_with_extension, require_file},
        pipeline::AspPipeline,
        types::{PairReport, PairState, StereoPair},
    },
    common::error::{PipelineError, Result},
    raster::RasterReader,
};

const MATCH_EXTENSION: &str = "match";
const PAIR_SEPARATOR: &str = "__";

/// Extracts the frame identifiers `(A, B)` from a match file name of the form
/// `<prefix>-A__B.match`.
///
/// bundle_adjust also writes `<prefix>-A__B-clean.match`; anything after a
/// dash following `B` is ignored, so frame identifiers cannot contain dashes.
pub fn parse_match_file_name(file_name: &str) -> Result<(String, String)> {
    let format_error = || {
        PipelineError::FormatError(format!(
            "'{file_name}' does not follow <prefix>-A__B.{MATCH_EXTENSION}"
        ))
    };

    let stem = file_name
        .strip_suffix(&format!(".{MATCH_EXTENSION}"))
        .ok_or_else(format_error)?;

    let mut parts = stem.split(PAIR_SEPARATOR);
    let (left, right) = match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => (left, right),
        _ => return Err(format_error()),
    };

    let frame_a = left.rsplit('-').next().unwrap_or(left);
    let frame_b = right.split('-').next().unwrap_or(right);
    if frame_a.is_empty() || frame_b.is_empty() {
        return Err(format_error());
    }

    Ok((frame_a.to_string(), frame_b.to_string()))
}

/// Camera whose stem is the frame id itself, or the frame id behind a
/// bundle_adjust output prefix (`run-A`).
fn find_camera<'a>(cameras: &'a [PathBuf], frame: &str) -> Option<&'a PathBuf> {
    let prefixed = format!("-{frame}");
    cameras.iter().find(|camera| {
        camera
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem == frame || stem.ends_with(&prefixed))
    })
}

impl<C: CommandRunner, R: RasterReader> AspPipeline<C, R> {
    /// Resolves every match file in `match_directory` to a [`StereoPair`].
    ///
    /// Pairs are returned in match file name order; a pair named by several
    /// match files (raw and `-clean`) is returned once.
    pub fn discover_stereo_pairs(
        &self,
        match_directory: &Path,
        image_directory: &Path,
        camera_directory: &Path,
        stereo_output_directory: &Path,
    ) -> Result<Vec<StereoPair>> {
        let match_files = list_files_with_extension(match_directory, MATCH_EXTENSION)?;
        let cameras = list_files_with_extension(camera_directory, &self.config().camera_extension)?;
        if match_files.is_empty() {
            warn!("No match files in {}", match_directory.display());
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for match_file in match_files {
            let file_name = match_file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| PipelineError::FormatError(match_file.display().to_string()))?;
            let (frame_a, frame_b) = parse_match_file_name(file_name)?;
            if !seen.insert((frame_a.clone(), frame_b.clone())) {
                debug!("Skipping duplicate match file {}", file_name);
                continue;
            }

            let image_extension = &self.config().image_extension;
            let image_a = image_directory.join(format!("{frame_a}.{image_extension}"));
            let image_b = image_directory.join(format!("{frame_b}.{image_extension}"));
            require_file(&image_a)?;
            require_file(&image_b)?;

            let camera_for = |frame: &str| {
                find_camera(&cameras, frame).cloned().ok_or_else(|| {
                    PipelineError::MissingInput(camera_directory.join(format!(
                        "{frame}.{}",
                        self.config().camera_extension
                    )))
                })
            };
            let camera_a = camera_for(&frame_a)?;
            let camera_b = camera_for(&frame_b)?;

            let output_prefix = stereo_output_directory
                .join(format!("{frame_a}{PAIR_SEPARATOR}{frame_b}"))
                .join("run");

            pairs.push(StereoPair {
                frame_a,
                frame_b,
                match_file,
                image_a,
                image_b,
                camera_a,
                camera_b,
                output_prefix,
            });
        }

        Ok(pairs)
    }

    /// Runs parallel_stereo and point2dem on every pair found in
    /// `match_directory`, one pair at a time.
    ///
    /// Discovery errors abort the iteration. Tool failures only end their own
    /// pair, in [`PairState::StereoFailed`] or [`PairState::GriddingFailed`],
    /// and the next pair runs.
    pub fn iter_stereo_pairs(
        &self,
        match_directory: &Path,
        image_directory: &Path,
        camera_directory: &Path,
        stereo_output_directory: &Path,
    ) -> Result<Vec<PairReport>> {
        let pairs = self.discover_stereo_pairs(
            match_directory,
            image_directory,
            camera_directory,
            stereo_output_directory,
        )?;

        let mut reports = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let state = self.process_pair(&pair);
            reports.push(PairReport { pair, state });
        }

        let gridded = reports
            .iter()
            .filter(|r| matches!(r.state, PairState::Gridded(_)))
            .count();
        info!("Gridded {} of {} stereo pairs", gridded, reports.len());
        Ok(reports)
    }

    fn process_pair(&self, pair: &StereoPair) -> PairState {
        let mut state = PairState::Discovered;
        let mut advance = |next: PairState| {
            debug!(pair = %pair.name(), "{:?} -> {:?}", state, next);
            state = next;
        };

        info!(
            "Running parallel stereo on {} and {}",
            pair.image_a.display(),
            pair.image_b.display()
        );
        advance(PairState::StereoRunning);
        let stereo = self.parallel_stereo(
            &pair.image_a,
            &pair.image_b,
            &pair.camera_a,
            &pair.camera_b,
            &pair.output_prefix,
        );
        let stereo_directory = match stereo {
            Ok(directory) => directory,
            Err(e) => {
                let message = format!(
                    "Stereo failed for {} and {}: {}",
                    pair.frame_a, pair.frame_b, e
                );
                warn!("{}", message);
                advance(PairState::StereoFailed(message));
                return state;
            }
        };
        advance(PairState::StereoDone);

        advance(PairState::GriddingRunning);
        match self.grid_point_cloud(&stereo_directory) {
            Ok(dem) => advance(PairState::Gridded(dem)),
            Err(e) => {
                let message = format!(
                    "Unable to generate point cloud from {} and {}: {}",
                    pair.frame_a, pair.frame_b, e
                );
                warn!("{}", message);
                advance(PairState::GriddingFailed(message));
            }
        }

        state
    }

    fn grid_point_cloud(&self, stereo_directory: &Path) -> Result<PathBuf> {
        let mut clouds: Vec<PathBuf> = std::fs::read_dir(stereo_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with("PC.tif"))
            })
            .collect();
        clouds.sort();

        let point_cloud = clouds
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::MissingInput(stereo_directory.join("*PC.tif")))?;
        self.point2dem(&point_cloud)
    }
}
