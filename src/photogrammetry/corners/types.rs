//! Corner and heading types

use std::fmt;

use crate::photogrammetry::common::error::{PipelineError, Result};
use crate::photogrammetry::geodesy::GeoPoint;

/// Aircraft bearing over ground, degrees clockwise from geographic north,
/// normalised into `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Heading(f64);

impl Heading {
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        if !degrees.is_finite() {
            return Err(PipelineError::InvalidCoordinate(format!(
                "heading {degrees}"
            )));
        }
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid can round tiny negative inputs up to exactly 360
        Ok(Self(if normalized >= 360.0 { 0.0 } else { normalized }))
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    pub fn radians(&self) -> f64 {
        self.0.to_radians()
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Corner of the unrotated footprint, named as seen from above with north up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperLeft,
    UpperRight,
    LowerRight,
    LowerLeft,
}

impl Corner {
    /// Order in which cam_gen reads `--lon-lat-values`, i.e. the corners it
    /// pairs with image pixels (0,0), (W,0), (W,H), (0,H).
    // TODO: geometrically this should be UL, UR, LR, LL; check against the
    // cam_gen documentation of the installed ASP release before changing.
    pub const CAM_GEN_ORDER: [Corner; 4] = [
        Corner::LowerRight,
        Corner::UpperRight,
        Corner::UpperLeft,
        Corner::LowerLeft,
    ];

    /// Unit offset `(x, y)` from the frame center, x towards east and y
    /// towards north at heading 0
    pub fn unit_offset(&self) -> (f64, f64) {
        match self {
            Corner::UpperLeft => (-1.0, 1.0),
            Corner::UpperRight => (1.0, 1.0),
            Corner::LowerRight => (1.0, -1.0),
            Corner::LowerLeft => (-1.0, -1.0),
        }
    }
}

/// Four frame corners in [`Corner::CAM_GEN_ORDER`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerQuad<P> {
    pub points: [P; 4],
}

impl<P> CornerQuad<P> {
    pub fn map<Q>(self, f: impl FnMut(P) -> Q) -> CornerQuad<Q> {
        CornerQuad {
            points: self.points.map(f),
        }
    }

    pub fn try_map<Q, E>(
        self,
        mut f: impl FnMut(P) -> std::result::Result<Q, E>,
    ) -> std::result::Result<CornerQuad<Q>, E> {
        let [a, b, c, d] = self.points;
        Ok(CornerQuad {
            points: [f(a)?, f(b)?, f(c)?, f(d)?],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.points.iter()
    }

    /// Point for a named corner
    pub fn corner(&self, corner: Corner) -> &P {
        let index = Corner::CAM_GEN_ORDER
            .iter()
            .position(|c| *c == corner)
            .unwrap_or_default();
        &self.points[index]
    }
}

/// Fractional digits written per coordinate; 1e-10° is well under a millimetre.
const DEGREE_PRECISION: usize = 10;

/// `lon1,lat1,lon2,lat2,lon3,lat3,lon4,lat4`, the `--lon-lat-values` format
impl fmt::Display for CornerQuad<GeoPoint> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(
                f,
                "{:.prec$},{:.prec$}",
                point.lon,
                point.lat,
                prec = DEGREE_PRECISION
            )?;
        }
        Ok(())
    }
}
