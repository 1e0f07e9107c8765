//! Raster reader backed by the `tiff` crate.
//!
//! Scanned aerial frames are delivered as (Geo)TIFF; the decoder is only asked
//! for the first IFD, so pixel data is never decompressed.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::photogrammetry::common::error::{PipelineError, Result};
use crate::photogrammetry::raster::reader::RasterReader;
use crate::photogrammetry::raster::types::RasterSize;

pub struct TiffRasterReader;

impl RasterReader for TiffRasterReader {
    fn read_size(&self, path: &Path) -> Result<RasterSize> {
        if !path.is_file() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))
            .map_err(|e| PipelineError::RasterReadError(format!("{}: {}", path.display(), e)))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| PipelineError::RasterReadError(format!("{}: {}", path.display(), e)))?;

        debug!("Read raster size {}x{} from {}", width, height, path.display());
        Ok(RasterSize { width, height })
    }
}
