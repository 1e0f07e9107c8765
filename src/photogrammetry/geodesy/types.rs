//! Geodetic coordinate types

use std::fmt;

use crate::photogrammetry::common::error::Result;
use crate::photogrammetry::geodesy::projection;

/// A WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Latitude/longitude of the camera at exposure time
pub type CameraCenter = GeoPoint;

/// UTM zone descriptor: zone number plus latitude band letter
///
/// The band letter fixes the hemisphere, which the inverse projection needs
/// to pick the false northing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub number: u8,
    pub letter: char,
}

impl UtmZone {
    pub fn is_northern(&self) -> bool {
        self.letter.to_ascii_uppercase() >= 'N'
    }

    /// Longitude of the zone's central meridian in degrees
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }

    /// PROJ definition of this zone, as expected by point2dem `--t_srs`
    pub fn proj_string(&self) -> String {
        let south = if self.is_northern() { "" } else { " +south" };
        format!(
            "+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs",
            self.number, south
        )
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

/// Easting/northing in metres within a UTM zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub easting: f64,
    pub northing: f64,
    pub zone: UtmZone,
}

impl ProjectedPoint {
    /// Shifts the point by `(d_east, d_north)` metres, staying in the same zone.
    pub fn offset(&self, d_east: f64, d_north: f64) -> Self {
        Self {
            easting: self.easting + d_east,
            northing: self.northing + d_north,
            zone: self.zone,
        }
    }

    pub fn to_geo(&self) -> Result<GeoPoint> {
        projection::from_local_projection(
            self.easting,
            self.northing,
            self.zone.number,
            self.zone.letter,
        )
    }
}
