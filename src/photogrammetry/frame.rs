//! Frame geometry module
//!
//! Describes a scanned aerial frame and derives its ground footprint from the
//! pinhole scale at a given flying height.

mod footprint;
pub mod types;

pub use footprint::ground_half_extents;
pub use types::{FrameSpec, GroundExtents};
