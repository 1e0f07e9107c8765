//! Frame description types

use crate::photogrammetry::common::error::{PipelineError, Result};

/// Interior geometry of a scanned film frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSpec {
    /// Calibrated focal length of the survey camera in millimetres
    pub focal_length_mm: f64,
    /// Spacing between scanned pixels on the film in millimetres
    pub pixel_pitch_mm: f64,
    /// Width of the scanned image in pixels
    pub width_px: u32,
    /// Height of the scanned image in pixels
    pub height_px: u32,
}

impl FrameSpec {
    pub fn new(focal_length_mm: f64, pixel_pitch_mm: f64, width_px: u32, height_px: u32) -> Self {
        Self {
            focal_length_mm,
            pixel_pitch_mm,
            width_px,
            height_px,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(PipelineError::InvalidFrame(format!(
                "image dimensions {}x{}",
                self.width_px, self.height_px
            )));
        }
        if !(self.focal_length_mm.is_finite() && self.focal_length_mm > 0.0) {
            return Err(PipelineError::InvalidFrame(format!(
                "focal length {} mm",
                self.focal_length_mm
            )));
        }
        if !(self.pixel_pitch_mm.is_finite() && self.pixel_pitch_mm > 0.0) {
            return Err(PipelineError::InvalidFrame(format!(
                "pixel pitch {} mm",
                self.pixel_pitch_mm
            )));
        }
        Ok(())
    }

    pub fn focal_length_px(&self) -> f64 {
        self.focal_length_mm / self.pixel_pitch_mm
    }

    /// Principal point, assumed to sit at the image center
    pub fn principal_point_px(&self) -> (f64, f64) {
        (
            f64::from(self.width_px) / 2.0,
            f64::from(self.height_px) / 2.0,
        )
    }
}

/// Distance on the ground from the frame center to its edges, in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundExtents {
    pub half_width_m: f64,
    pub half_height_m: f64,
}
