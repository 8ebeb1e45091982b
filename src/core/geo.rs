//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Earth radius used for distance calculations, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates, rounded to whole meters.
///
/// Uses the spherical law of cosines. The cosine argument is clamped so that
/// floating point drift on identical or antipodal points cannot produce NaN.
pub fn great_circle_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    let from_lat = from.latitude.to_radians();
    let to_lat = to.latitude.to_radians();
    let delta_lon = from.longitude.to_radians() - to.longitude.to_radians();

    let cos_angle =
        to_lat.sin() * from_lat.sin() + to_lat.cos() * from_lat.cos() * delta_lon.cos();
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    (angle * EARTH_RADIUS_METERS).round()
}
