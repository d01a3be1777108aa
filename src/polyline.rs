//! Polyline representation and codec for route geometries.
//!
//! Routing providers ship geometries in the compact delta-encoded polyline
//! format (signed varints, 1e-5 degree precision). This module decodes them
//! into coordinate sequences at the API boundary; internal processing works
//! on decoded points only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scale factor of the encoding: five decimal places.
const PRECISION: f64 = 1e5;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolylineError {
    /// The string ended in the middle of a varint or after an unpaired
    /// latitude delta.
    #[error("polyline ended mid-value")]
    UnexpectedEnd,
    /// A byte outside the printable encoding alphabet.
    #[error("invalid polyline byte `{0}`")]
    InvalidByte(u8),
}

/// A route geometry as decoded coordinates.
///
/// Each point is a (latitude, longitude) tuple in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from already-decoded coordinate points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes the standard delta-encoded polyline format.
    ///
    /// Each point is a pair of signed varints (latitude then longitude delta
    /// against the previous point), zigzag-encoded in 5-bit chunks offset by
    /// 63. An empty string decodes to an empty polyline.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let mut bytes = encoded.bytes();
        let mut points = Vec::new();
        let mut lat: i64 = 0;
        let mut lon: i64 = 0;

        loop {
            let Some(lat_delta) = decode_value(&mut bytes)? else {
                break;
            };
            let lon_delta = decode_value(&mut bytes)?.ok_or(PolylineError::UnexpectedEnd)?;
            lat += lat_delta;
            lon += lon_delta;
            points.push((lat as f64 / PRECISION, lon as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    /// Encodes the polyline back to the compact format.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut prev_lat: i64 = 0;
        let mut prev_lon: i64 = 0;

        for &(lat, lon) in &self.points {
            let lat_e5 = (lat * PRECISION).round() as i64;
            let lon_e5 = (lon * PRECISION).round() as i64;
            encode_value(lat_e5 - prev_lat, &mut out);
            encode_value(lon_e5 - prev_lon, &mut out);
            prev_lat = lat_e5;
            prev_lon = lon_e5;
        }

        out
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

/// Reads one signed varint. `Ok(None)` only at a clean value boundary.
fn decode_value(bytes: &mut impl Iterator<Item = u8>) -> Result<Option<i64>, PolylineError> {
    let mut accumulator: i64 = 0;
    let mut shift = 0;
    let mut started = false;

    loop {
        let Some(byte) = bytes.next() else {
            return if started {
                Err(PolylineError::UnexpectedEnd)
            } else {
                Ok(None)
            };
        };
        if !(63..=127).contains(&byte) {
            return Err(PolylineError::InvalidByte(byte));
        }
        started = true;

        let chunk = i64::from(byte - 63);
        accumulator |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk & 0x20 == 0 {
            break;
        }
    }

    let value = if accumulator & 1 != 0 {
        !(accumulator >> 1)
    } else {
        accumulator >> 1
    };
    Ok(Some(value))
}

fn encode_value(value: i64, out: &mut String) {
    let mut zigzag = if value < 0 { !(value << 1) } else { value << 1 };
    while zigzag >= 0x20 {
        out.push((((zigzag & 0x1f) | 0x20) as u8 + 63) as char);
        zigzag >>= 5;
    }
    out.push((zigzag as u8 + 63) as char);
}
