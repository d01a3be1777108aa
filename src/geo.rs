//! Validated WGS-84 coordinates and great-circle distance.
//!
//! `Point` can only be constructed from finite, in-range values, so every
//! downstream distance computation starts from well-formed input instead of
//! silently ranking on NaN.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate is not a finite number")]
    NotFinite,
}

/// A WGS-84 coordinate pair in degrees.
///
/// Invariant: both components are finite, latitude in [-90, 90], longitude
/// in [-180, 180]. Deserialization revalidates, so stored or wire data cannot
/// smuggle in malformed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawPoint", try_from = "RawPoint")]
pub struct Point {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPoint {
    lat: f64,
    lon: f64,
}

impl From<Point> for RawPoint {
    fn from(point: Point) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
        }
    }
}

impl TryFrom<RawPoint> for Point {
    type Error = GeoError;

    fn try_from(raw: RawPoint) -> Result<Self, GeoError> {
        Point::new(raw.lat, raw.lon)
    }
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Great-circle distance between two points in kilometers.
///
/// Haversine closed form on a sphere of radius [`EARTH_RADIUS_KM`]. Good
/// enough for intra-city ranking; not a geodesic.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).expect("valid test coordinate")
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Point::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Point::new(0.0, -180.1),
            Err(GeoError::LongitudeOutOfRange(-180.1))
        );
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert_eq!(Point::new(f64::NAN, 0.0), Err(GeoError::NotFinite));
        assert_eq!(Point::new(0.0, f64::INFINITY), Err(GeoError::NotFinite));
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(Point::new(90.0, 180.0).is_ok());
        assert!(Point::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn same_point_distance_is_zero() {
        let p = point(25.1972, 55.2744);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(25.2048, 55.2708);
        let b = point(25.0772, 55.1395);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_city_distances() {
        // Downtown Dubai user location against two branches.
        let user = point(25.1972, 55.2744);
        let near = point(25.2048, 55.2708);
        let far = point(25.0772, 55.1395);

        let near_km = haversine_km(user, near);
        let far_km = haversine_km(user, far);
        assert!((near_km - 0.93).abs() < 0.2, "got {near_km}");
        assert!((far_km - 18.9).abs() < 0.8, "got {far_km}");
        assert!(near_km < far_km);
    }

    #[test]
    fn deserialization_revalidates() {
        let parsed: Result<Point, _> = serde_json::from_str(r#"{"lat": 91.0, "lon": 0.0}"#);
        assert!(parsed.is_err());

        let ok: Point = serde_json::from_str(r#"{"lat": 25.2048, "lon": 55.2708}"#)
            .expect("valid point deserializes");
        assert_eq!(ok, point(25.2048, 55.2708));
    }
}
