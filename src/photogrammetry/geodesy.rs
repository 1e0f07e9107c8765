//! Geodetic helper module
//!
//! Converts WGS84 latitude/longitude to and from UTM coordinates. Frame corners
//! are computed in UTM, where a few kilometres of footprint are flat enough to
//! treat as a plane.

mod projection;
pub mod types;

pub use types::{CameraCenter, GeoPoint, ProjectedPoint, UtmZone};
pub use projection::{from_local_projection, to_local_projection, zone_for};
