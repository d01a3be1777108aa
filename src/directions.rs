//! Directions HTTP adapter.
//!
//! Fetches a road route between two coordinates from a
//! Google-directions-shaped JSON API and decodes the overview polyline before
//! handing the route to callers.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::geo::Point;
use crate::polyline::{Polyline, PolylineError};
use crate::traits::DirectionsProvider;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions API key is not configured")]
    MissingApiKey,
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("directions API returned `{status}`: {message}")]
    Api { status: String, message: String },
    #[error("directions API returned an undecodable geometry: {0}")]
    BadGeometry(#[from] PolylineError),
}

/// A routed path with its human-readable travel time.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Polyline,
    pub duration_text: String,
}

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Configuration against the hosted provider endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        if config.api_key.trim().is_empty() {
            return Err(DirectionsError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl DirectionsProvider for DirectionsClient {
    fn route(&self, origin: Point, destination: Point) -> Result<Option<Route>, DirectionsError> {
        let origin_param = format!("{:.6},{:.6}", origin.lat(), origin.lon());
        let destination_param = format!("{:.6},{:.6}", destination.lat(), destination.lon());

        let response: DirectionsResponse = self
            .client
            .get(self.config.base_url.as_str())
            .query(&[
                ("origin", origin_param.as_str()),
                ("destination", destination_param.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        match response.status.as_str() {
            "OK" => match response.routes.first() {
                Some(route) => {
                    let path = Polyline::decode(&route.overview_polyline.points)?;
                    let duration_text = route
                        .legs
                        .first()
                        .map(|leg| leg.duration.text.clone())
                        .unwrap_or_default();
                    debug!(
                        points = path.points().len(),
                        duration = %duration_text,
                        "route decoded"
                    );
                    Ok(Some(Route {
                        path,
                        duration_text,
                    }))
                }
                None => Ok(None),
            },
            // Unreachable or coincident locations; a normal outcome.
            "ZERO_RESULTS" => {
                debug!("no route between locations");
                Ok(None)
            }
            status => Err(DirectionsError::Api {
                status: status.to_string(),
                message: response.error_message.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<RouteEntry>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    overview_polyline: OverviewPolyline,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: TextField,
}

#[derive(Debug, Deserialize)]
struct TextField {
    text: String,
}
