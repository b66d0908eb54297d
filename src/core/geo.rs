// src/core/geo.rs

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Displaces the point by the given number of meters north and east.
    ///
    /// Uses the flat-earth approximation, which is fine for the few hundred meters
    /// of simulated GPS jitter it is used for.
    pub fn offset_m(self, north_m: f64, east_m: f64) -> Self {
        let dlat = (north_m / EARTH_RADIUS_M).to_degrees();
        let dlon = (east_m / (EARTH_RADIUS_M * self.latitude.to_radians().cos())).to_degrees();
        Self {
            latitude: self.latitude + dlat,
            longitude: self.longitude + dlon,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Great-circle distance between two points, in meters.
pub fn haversine_distance_m(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h marginally above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_M * c
}

/// A named circular area used for check-in membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Geofence {
    pub name: String,
    pub center: Coordinates,
    pub radius_m: f64,
}

impl Geofence {
    pub fn distance_to(&self, point: Coordinates) -> f64 {
        haversine_distance_m(self.center, point)
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        self.distance_to(point) <= self.radius_m
    }
}

/// Finds the geofence whose center is closest to `point`.
///
/// Returns `None` if `fences` is empty.
pub fn nearest_geofence(fences: &[Geofence], point: Coordinates) -> Option<(&Geofence, f64)> {
    fences
        .iter()
        .map(|fence| (fence, fence.distance_to(point)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}
