//! Corner synthesis module
//!
//! Builds the four ground corners of a frame footprint and serialises them
//! into the `--lon-lat-values` argument of the camera generator.

mod formatter;
mod projector;
pub mod types;

pub use formatter::{corner_coordinates_string, corner_quad_wgs84};
pub use projector::rotate_corners;
pub use types::{Corner, CornerQuad, Heading};
