//! WGS84 <-> UTM conversion backed by the `utm` crate.

use tracing::trace;

use crate::photogrammetry::common::error::{PipelineError, Result};
use crate::photogrammetry::geodesy::types::{GeoPoint, ProjectedPoint, UtmZone};

/// Band letters accepted by the inverse; `I` and `O` are never used.
const BAND_LETTERS: &str = "CDEFGHJKLMNPQRSTUVWX";

const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

fn check_lat_lon(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(PipelineError::InvalidCoordinate(format!(
            "latitude {lat} outside UTM range [{MIN_LATITUDE}, {MAX_LATITUDE}]"
        )));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(PipelineError::InvalidCoordinate(format!(
            "longitude {lon} outside [-180, 180]"
        )));
    }
    Ok(())
}

/// UTM zone containing `(lat, lon)`, including the Norway and Svalbard exceptions.
pub fn zone_for(lat: f64, lon: f64) -> Result<UtmZone> {
    check_lat_lon(lat, lon)?;

    let letter = utm::lat_to_zone_letter(lat).ok_or_else(|| {
        PipelineError::InvalidCoordinate(format!("no UTM band for latitude {lat}"))
    })?;
    // lon = 180 belongs to zone 60, not to a 61st zone
    let number = utm::lat_lon_to_zone_number(lat, lon).clamp(1, 60);

    Ok(UtmZone { number, letter })
}

/// Projects a WGS84 position into the UTM zone inferred from it.
pub fn to_local_projection(lat: f64, lon: f64) -> Result<ProjectedPoint> {
    let zone = zone_for(lat, lon)?;
    let (mut northing, easting, _convergence) =
        utm::to_utm_wgs84(lat.to_radians(), lon.to_radians(), zone.number);
    if !zone.is_northern() && northing < 0.0 {
        northing += FALSE_NORTHING_SOUTH;
    }
    trace!(lat, lon, %zone, easting, northing, "projected to UTM");
    Ok(ProjectedPoint {
        easting,
        northing,
        zone,
    })
}

/// Converts UTM coordinates back to WGS84.
///
/// Corners of a frame near the equator are projected in the zone of the frame
/// center and may cross into the other hemisphere. Such northings are moved
/// by the false northing and read in the matching hemisphere band.
pub fn from_local_projection(
    easting: f64,
    northing: f64,
    zone_number: u8,
    hemisphere_letter: char,
) -> Result<GeoPoint> {
    if !(1..=60).contains(&zone_number) {
        return Err(PipelineError::InvalidCoordinate(format!(
            "UTM zone number {zone_number} outside [1, 60]"
        )));
    }
    let letter = hemisphere_letter.to_ascii_uppercase();
    if !BAND_LETTERS.contains(letter) {
        return Err(PipelineError::InvalidCoordinate(format!(
            "unknown UTM band letter '{hemisphere_letter}'"
        )));
    }
    if !easting.is_finite() || !northing.is_finite() {
        return Err(PipelineError::InvalidCoordinate(format!(
            "non-finite UTM coordinate ({easting}, {northing})"
        )));
    }

    let northern = UtmZone {
        number: zone_number,
        letter,
    }
    .is_northern();
    let (northing, letter) = match (northern, northing) {
        (true, n) if n < 0.0 => (n + FALSE_NORTHING_SOUTH, 'M'),
        (false, n) if n > FALSE_NORTHING_SOUTH => (n - FALSE_NORTHING_SOUTH, 'N'),
        (_, n) => (n, letter),
    };

    let (lat, lon) = utm::wsg84_utm_to_lat_lon(easting, northing, zone_number, letter)
        .map_err(|_| {
            PipelineError::InvalidCoordinate(format!(
                "UTM ({easting}, {northing}) outside zone {zone_number}{letter}"
            ))
        })?;
    Ok(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zone_inference() {
        let zone = zone_for(47.0, -121.5).unwrap();
        assert_eq!(zone, UtmZone { number: 10, letter: 'T' });
        assert!(zone.is_northern());

        assert_eq!(zone_for(0.0, 0.0).unwrap(), UtmZone { number: 31, letter: 'N' });
        assert_eq!(zone_for(-33.9, 18.4).unwrap(), UtmZone { number: 34, letter: 'H' });
        assert_eq!(zone_for(84.0, 180.0).unwrap().number, 60);
        assert_eq!(zone_for(84.0, 180.0).unwrap().letter, 'X');
    }

    #[test]
    fn test_zone_exceptions() {
        assert_eq!(zone_for(60.0, 5.0).unwrap().number, 32);
        assert_eq!(zone_for(78.0, 15.0).unwrap().number, 33);
        assert_eq!(zone_for(78.0, 40.0).unwrap().number, 37);
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(matches!(
            to_local_projection(85.0, 0.0),
            Err(PipelineError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            to_local_projection(-80.5, 0.0),
            Err(PipelineError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            to_local_projection(10.0, 181.0),
            Err(PipelineError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            to_local_projection(f64::NAN, 0.0),
            Err(PipelineError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            from_local_projection(500_000.0, 0.0, 0, 'N'),
            Err(PipelineError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            from_local_projection(500_000.0, 0.0, 10, 'I'),
            Err(PipelineError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_known_projection() {
        let p = to_local_projection(47.0, -121.5).unwrap();
        assert_abs_diff_eq!(p.easting, 614_037.47, epsilon = 0.05);
        assert_abs_diff_eq!(p.northing, 5_206_255.96, epsilon = 0.05);
    }

    #[test]
    fn test_central_meridian() {
        let origin = to_local_projection(0.0, 3.0).unwrap();
        assert_abs_diff_eq!(origin.easting, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(origin.northing, 0.0, epsilon = 1e-6);

        // meridian arc length to 45°N on WGS84, scaled by k0
        let p = to_local_projection(45.0, -123.0).unwrap();
        assert_abs_diff_eq!(p.easting, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.northing, 0.9996 * 4_984_944.378, epsilon = 0.05);
    }

    #[test]
    fn test_points_across_the_equator() {
        let north = to_local_projection(0.0, 3.0).unwrap();
        let south = north.offset(0.0, -5_000.0).to_geo().unwrap();
        assert!(south.lat < 0.0);
        assert_abs_diff_eq!(south.lon, 3.0, epsilon = 1e-9);

        let back = north.offset(0.0, 5_000.0).to_geo().unwrap();
        assert_abs_diff_eq!(back.lat, -south.lat, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let mut lat = -79.5;
        while lat < 80.0 {
            let mut lon = -179.9;
            while lon < 180.0 {
                let p = to_local_projection(lat, lon).unwrap();
                let back = p.to_geo().unwrap();
                assert_abs_diff_eq!(back.lat, lat, epsilon = 1e-6);
                assert_abs_diff_eq!(back.lon, lon, epsilon = 1e-6);
                lon += 7.3;
            }
            lat += 4.5;
        }
    }

    #[test]
    fn test_southern_hemisphere_uses_false_northing() {
        let p = to_local_projection(-45.0, 170.0).unwrap();
        assert!(!p.zone.is_northern());
        assert!(p.northing > 4_000_000.0 && p.northing < 10_000_000.0);

        let back = from_local_projection(p.easting, p.northing, p.zone.number, 'g').unwrap();
        assert_abs_diff_eq!(back.lat, -45.0, epsilon = 1e-7);
        assert_abs_diff_eq!(back.lon, 170.0, epsilon = 1e-7);
    }

    #[test]
    fn test_proj_string() {
        let north = UtmZone { number: 10, letter: 'T' };
        assert_eq!(
            north.proj_string(),
            "+proj=utm +zone=10 +datum=WGS84 +units=m +no_defs"
        );
        let south = UtmZone { number: 34, letter: 'H' };
        assert_eq!(
            south.proj_string(),
            "+proj=utm +zone=34 +south +datum=WGS84 +units=m +no_defs"
        );
    }
}
