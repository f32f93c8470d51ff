//! Great-circle distance between coordinates.
//!
//! Coordinates are signed decimal degrees. Nothing here validates ranges;
//! the facade rejects malformed coordinates before they reach the core.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every distance computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Distance in kilometres to another point.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(self, other)
    }
}

/// Haversine great-circle distance in kilometres.
pub fn distance_km(origin: &GeoPoint, target: &GeoPoint) -> f64 {
    let d_lat = (target.latitude - origin.latitude).to_radians();
    let d_lon = (target.longitude - origin.longitude).to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();
    let a = half_lat * half_lat
        + origin.latitude.to_radians().cos()
            * target.latitude.to_radians().cos()
            * half_lon
            * half_lon;
    // Rounding can push `a` past 1 for near-antipodal points
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
