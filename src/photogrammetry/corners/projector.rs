use crate::photogrammetry::corners::types::{Corner, CornerQuad, Heading};
use crate::photogrammetry::frame::GroundExtents;
use crate::photogrammetry::geodesy::ProjectedPoint;

/// Rotates the footprint rectangle about the camera center by the heading.
///
/// The unrotated corners sit at `(±half_width, ±half_height)` with x along
/// easting and y along northing. They are turned with the standard 2-D
/// rotation matrix by the heading angle and translated onto the center. The
/// flat-earth assumption holds at frame scale, so all four corners share the
/// UTM zone of the center.
pub fn rotate_corners(
    center: &ProjectedPoint,
    extents: &GroundExtents,
    heading: Heading,
) -> CornerQuad<ProjectedPoint> {
    let (sin, cos) = heading.radians().sin_cos();

    CornerQuad {
        points: Corner::CAM_GEN_ORDER.map(|corner| {
            let (ux, uy) = corner.unit_offset();
            let x = ux * extents.half_width_m;
            let y = uy * extents.half_height_m;
            center.offset(x * cos - y * sin, x * sin + y * cos)
        }),
    }
}
