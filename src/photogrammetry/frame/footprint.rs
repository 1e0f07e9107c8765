use tracing::debug;

use crate::photogrammetry::common::error::{PipelineError, Result};
use crate::photogrammetry::frame::types::{FrameSpec, GroundExtents};

/// Half-width and half-height of the ground footprint of a nadir frame.
///
/// Pinhole scale: a film distance `d` maps to `d * altitude / focal` on flat
/// ground. The principal point is the image center, so the edges are
/// `width/2` and `height/2` pixels away from it.
pub fn ground_half_extents(
    focal_length_mm: f64,
    image_width_px: u32,
    image_height_px: u32,
    pixel_pitch_mm: f64,
    altitude_m: f64,
) -> Result<GroundExtents> {
    FrameSpec::new(focal_length_mm, pixel_pitch_mm, image_width_px, image_height_px).validate()?;
    if !(altitude_m.is_finite() && altitude_m > 0.0) {
        return Err(PipelineError::InvalidFrame(format!(
            "altitude {altitude_m} m"
        )));
    }

    let scale = pixel_pitch_mm / focal_length_mm * altitude_m;
    let extents = GroundExtents {
        half_width_m: f64::from(image_width_px) / 2.0 * scale,
        half_height_m: f64::from(image_height_px) / 2.0 * scale,
    };

    debug!(
        half_width_m = extents.half_width_m,
        half_height_m = extents.half_height_m,
        "Computed ground footprint"
    );
    Ok(extents)
}

impl FrameSpec {
    pub fn ground_half_extents(&self, altitude_m: f64) -> Result<GroundExtents> {
        ground_half_extents(
            self.focal_length_mm,
            self.width_px,
            self.height_px,
            self.pixel_pitch_mm,
            altitude_m,
        )
    }
}
