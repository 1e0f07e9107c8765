//! Raster reading module
//!
//! Only image dimensions are ever needed from the scanned frames, so readers
//! stop after the header.

mod reader;
mod tiff_reader;
pub mod types;

pub use reader::RasterReader;
pub use tiff_reader::TiffRasterReader;
pub use types::RasterSize;
