//! Geocoding HTTP adapter.
//!
//! Talks to a Google-geocoding-shaped JSON API: one GET per lookup, a
//! `status` discriminant, and the first result's `geometry.location`.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::geo::{GeoError, Point};
use crate::traits::Geocoder;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding API key is not configured")]
    MissingApiKey,
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding API returned `{status}`: {message}")]
    Api { status: String, message: String },
    #[error("geocoding API returned an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] GeoError),
}

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl GeocodeConfig {
    /// Configuration against the hosted provider endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    config: GeocodeConfig,
    client: reqwest::blocking::Client,
}

impl GeocodeClient {
    /// Builds the client. A blank API key is rejected here rather than being
    /// sent along and failing remotely.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        if config.api_key.trim().is_empty() {
            return Err(GeocodeError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for GeocodeClient {
    fn geocode(&self, address: &str) -> Result<Option<Point>, GeocodeError> {
        let response: GeocodeResponse = self
            .client
            .get(self.config.base_url.as_str())
            .query(&[("address", address), ("key", self.config.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json()?;

        match response.status.as_str() {
            "OK" => match response.results.first() {
                Some(result) => {
                    let location = &result.geometry.location;
                    let point = Point::new(location.lat, location.lng)?;
                    debug!(address, lat = point.lat(), lon = point.lon(), "geocoded");
                    Ok(Some(point))
                }
                None => Ok(None),
            },
            "ZERO_RESULTS" => {
                debug!(address, "geocoder found no match");
                Ok(None)
            }
            status => Err(GeocodeError::Api {
                status: status.to_string(),
                message: response.error_message.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
