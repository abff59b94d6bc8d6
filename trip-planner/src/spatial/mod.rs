//! Geospatial primitives.
//!
//! All coordinates are `(latitude, longitude)` pairs in decimal degrees.
//! Two distance measures are provided: haversine for accurate great-circle
//! distance, and an equirectangular approximation that is cheap enough to
//! evaluate on every node the pathfinder touches.

use std::f64::consts::PI;
use std::fmt;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.32;

/// A `(latitude, longitude)` pair in decimal degrees.
pub type Coords = (f64, f64);

/// A named point on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable label, if the caller has one.
    pub address: Option<String>,
}

impl Location {
    /// Create an unlabelled location.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }

    /// Attach a human-readable label.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Returns the location as a `(lat, lon)` pair.
    pub fn coords(&self) -> Coords {
        (self.latitude, self.longitude)
    }

    /// Returns the address if set, otherwise the formatted coordinates.
    pub fn label(&self) -> String {
        match &self.address {
            Some(address) => address.clone(),
            None => self.to_string(),
        }
    }
}

impl From<Coords> for Location {
    fn from((latitude, longitude): Coords) -> Self {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Great-circle distance between two points, in meters.
pub fn haversine_m(a: Coords, b: Coords) -> f64 {
    let phi1 = to_radians(a.0);
    let phi2 = to_radians(b.0);
    let delta_phi = to_radians(b.0 - a.0);
    let delta_lambda = to_radians(b.1 - a.1);

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Equirectangular distance approximation, in kilometers.
///
/// The longitude delta is scaled by the cosine of the mean latitude. Accurate
/// to well under a percent at city scale.
pub fn equirectangular_km(a: Coords, b: Coords) -> f64 {
    let mean_lat = to_radians((a.0 + b.0) / 2.0);
    let dx = (a.1 - b.1) * mean_lat.cos() * KM_PER_DEGREE;
    let dy = (a.0 - b.0) * KM_PER_DEGREE;
    (dx * dx + dy * dy).sqrt()
}

/// Project a point `meters` away from `origin` along `bearing` (radians,
/// clockwise from north).
///
/// Uses flat degree offsets with the longitude component widened by
/// `1 / cos(latitude)`, which is adequate for the sub-kilometer radii the
/// planner works with.
pub fn offset(origin: Coords, meters: f64, bearing: f64) -> Coords {
    let degrees = meters / (KM_PER_DEGREE * 1000.0);
    let lat = origin.0 + degrees * bearing.cos();
    let lon = origin.1 + degrees * bearing.sin() / to_radians(origin.0).cos();
    (lat, lon)
}

/// `samples` points equally spaced on a circle of `radius_m` around `center`,
/// starting due north.
pub fn ring(center: Coords, radius_m: f64, samples: usize) -> Vec<Coords> {
    (0..samples)
        .map(|i| {
            let bearing = i as f64 * 2.0 * PI / samples as f64;
            offset(center, radius_m, bearing)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTREAL: Coords = (45.5017, -73.5673);

    #[test]
    fn haversine_zero_for_same_point() {
        assert_eq!(haversine_m(MONTREAL, MONTREAL), 0.0);
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let d = haversine_m((0.0, 0.0), (1.0, 0.0));
        let expected = EARTH_RADIUS_KM * 1000.0 * PI / 180.0;
        assert!((d - expected).abs() < 1.0, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let toronto = (43.6532, -79.3832);
        let a = haversine_m(MONTREAL, toronto);
        let b = haversine_m(toronto, MONTREAL);
        assert!((a - b).abs() < 1e-6);
        // Roughly 504 km apart
        assert!((a / 1000.0 - 504.0).abs() < 5.0, "got {a}");
    }

    #[test]
    fn equirectangular_matches_degree_constant() {
        let d = equirectangular_km((10.0, 20.0), (11.0, 20.0));
        assert!((d - KM_PER_DEGREE).abs() < 1e-9);
    }

    #[test]
    fn equirectangular_close_to_haversine_at_city_scale() {
        let other = (45.5200, -73.5400);
        let approx = equirectangular_km(MONTREAL, other) * 1000.0;
        let exact = haversine_m(MONTREAL, other);
        assert!((approx - exact).abs() / exact < 0.01);
    }

    #[test]
    fn offset_north_moves_latitude_only() {
        let (lat, lon) = offset(MONTREAL, 1000.0, 0.0);
        assert!(lat > MONTREAL.0);
        assert!((lon - MONTREAL.1).abs() < 1e-12);
    }

    #[test]
    fn ring_points_lie_on_radius() {
        let points = ring(MONTREAL, 800.0, 20);
        assert_eq!(points.len(), 20);
        for p in points {
            let d = haversine_m(MONTREAL, p);
            assert!((d - 800.0).abs() / 800.0 < 0.02, "point {p:?} at {d} m");
        }
    }

    #[test]
    fn ring_with_zero_samples_is_empty() {
        assert!(ring(MONTREAL, 800.0, 0).is_empty());
    }

    #[test]
    fn location_display_and_label() {
        let loc = Location::new(45.5, -73.25);
        assert_eq!(loc.to_string(), "45.500000,-73.250000");
        assert_eq!(loc.label(), "45.500000,-73.250000");
        let named = loc.with_address("Parking spot");
        assert_eq!(named.label(), "Parking spot");
    }
}
