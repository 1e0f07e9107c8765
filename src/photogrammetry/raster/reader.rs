use std::path::Path;

use crate::photogrammetry::common::error::Result;
use crate::photogrammetry::raster::types::RasterSize;

pub trait RasterReader {
    fn read_size(&self, path: &Path) -> Result<RasterSize>;
}
