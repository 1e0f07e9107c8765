use tracing::debug;

use crate::photogrammetry::common::error::{PipelineError, Result};
use crate::photogrammetry::corners::projector::rotate_corners;
use crate::photogrammetry::corners::types::{CornerQuad, Heading};
use crate::photogrammetry::frame::FrameSpec;
use crate::photogrammetry::geodesy::{CameraCenter, GeoPoint, to_local_projection};

/// Ground corners of a frame in WGS84, in camera-generator order.
pub fn corner_quad_wgs84(
    center: CameraCenter,
    frame: &FrameSpec,
    heading: Heading,
    altitude_m: f64,
) -> Result<CornerQuad<GeoPoint>> {
    let extents = frame.ground_half_extents(altitude_m)?;
    let projected_center = to_local_projection(center.lat, center.lon)?;

    rotate_corners(&projected_center, &extents, heading).try_map(|p| p.to_geo())
}

/// Serialises the frame corners as `lon,lat,lon,lat,lon,lat,lon,lat` for
/// `cam_gen --lon-lat-values`.
pub fn corner_coordinates_string(
    center: CameraCenter,
    frame: &FrameSpec,
    heading: Heading,
    altitude_m: f64,
) -> Result<String> {
    let quad = corner_quad_wgs84(center, frame, heading, altitude_m)?;
    if quad.iter().any(|p| !p.lat.is_finite() || !p.lon.is_finite()) {
        return Err(PipelineError::InvalidCoordinate(format!(
            "corner projection of ({}, {}) is not finite",
            center.lat, center.lon
        )));
    }

    let corners = quad.to_string();
    debug!(%heading, corners = %corners, "Corner coordinates");
    Ok(corners)
}
