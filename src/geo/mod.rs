//! Geographic math helpers.
//!
//! Pure functions shared by the map-data importer and the world assembler:
//! great-circle distance between WGS84 coordinates and a coarse UK
//! bounding-box check used to sanity-filter geocoding results.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate UK bounding box (degrees).
const UK_LAT_MIN: f64 = 49.9;
const UK_LAT_MAX: f64 = 60.9;
const UK_LON_MIN: f64 = -8.2;
const UK_LON_MAX: f64 = 1.8;

/// A geographic point in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude/longitude degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two coordinates in kilometers (Haversine).
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Check whether a coordinate falls inside the approximate UK bounding box.
pub fn is_within_uk(coord: Coordinate) -> bool {
    coord.latitude >= UK_LAT_MIN
        && coord.latitude <= UK_LAT_MAX
        && coord.longitude >= UK_LON_MIN
        && coord.longitude <= UK_LON_MAX
}
