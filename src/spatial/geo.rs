//! Points on the Earth's surface and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SarissaError};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.76;

/// Length of one degree of latitude in statute miles.
pub const MILES_PER_DEGREE_LATITUDE: f64 = 69.047;

/// A geographical point with latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new geographical point.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(SarissaError::malformed_query(format!(
                "Invalid latitude: {lat} (must be between -90 and 90)"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(SarissaError::malformed_query(format!(
                "Invalid longitude: {lng} (must be between -180 and 180)"
            )));
        }

        Ok(GeoPoint { lat, lng })
    }

    /// Haversine distance to another point in miles.
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        haversine_miles(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine great-circle distance in miles between two coordinates given
/// in degrees. Coordinates are not range-checked.
pub fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}
