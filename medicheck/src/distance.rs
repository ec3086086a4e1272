//! Great-circle distance between two coordinates.
//!
//! Distances are computed with the haversine formula on a sphere of mean
//! Earth radius and reported in statute miles.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance in miles from this coordinate to `other`.
    pub fn distance_miles(&self, other: &Coordinate) -> f64 {
        haversine_miles(*self, *other)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Haversine distance in miles between `a` and `b`.
///
/// The intermediate `sqrt(h)` is clamped to 1.0 so floating-point overshoot
/// near antipodal points never pushes `asin` outside its domain.
///
/// # Example
///
/// ```
/// use medicheck::distance::{haversine_miles, Coordinate};
///
/// let boston = Coordinate::new(42.3601, -71.0589);
/// let nyc = Coordinate::new(40.7128, -74.0060);
/// let miles = haversine_miles(boston, nyc);
/// assert!((miles - 190.0).abs() < 2.0);
/// ```
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}
