//! Nearest-store search orchestration.
//!
//! Wires the collaborators into the full flow: geocode the caller's address,
//! rank the store snapshot by great-circle distance, then enrich each match
//! with a road route and travel time. Route enrichment is best-effort; a
//! directions failure degrades that match to distance-only instead of
//! failing the whole search.

use thiserror::Error;
use tracing::{debug, warn};

use crate::directions::Route;
use crate::geo::Point;
use crate::geocode::GeocodeError;
use crate::models::StoreRecord;
use crate::resolver::{CategoryFilter, find_nearest};
use crate::traits::{Candidate, DirectionsProvider, Geocoder};

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error("address `{0}` could not be geocoded")]
    AddressNotFound(String),
}

/// One ranked store with its distance and optional route annotation.
#[derive(Debug)]
pub struct StoreMatch<'a> {
    pub store: &'a StoreRecord,
    pub distance_km: f64,
    pub route: Option<Route>,
}

/// Result of a nearest-store search.
#[derive(Debug)]
pub struct SearchOutcome<'a> {
    /// Where the caller's address resolved to.
    pub origin: Point,
    /// Closest stores, ascending by distance; possibly empty.
    pub matches: Vec<StoreMatch<'a>>,
}

/// Composes a geocoder and a directions provider into address-based search.
pub struct StoreLocator<G, D> {
    geocoder: G,
    directions: D,
}

impl<G, D> StoreLocator<G, D>
where
    G: Geocoder,
    D: DirectionsProvider,
{
    pub fn new(geocoder: G, directions: D) -> Self {
        Self {
            geocoder,
            directions,
        }
    }

    /// Finds the `k` stores nearest to a free-text address.
    ///
    /// An address the geocoder cannot resolve is a typed error the caller
    /// must surface; an empty match list (nothing passes the filter) is a
    /// normal outcome.
    pub fn find_nearest_stores<'a>(
        &self,
        address: &str,
        stores: &'a [StoreRecord],
        filter: &CategoryFilter,
        k: usize,
    ) -> Result<SearchOutcome<'a>, LocatorError> {
        let origin = self
            .geocoder
            .geocode(address)?
            .ok_or_else(|| LocatorError::AddressNotFound(address.to_string()))?;

        let ranked = find_nearest(origin, stores, filter, k);
        debug!(
            address,
            candidates = stores.len(),
            matches = ranked.len(),
            "ranked stores"
        );

        let matches = ranked
            .into_iter()
            .map(|entry| {
                let route = match self.directions.route(origin, entry.candidate.location()) {
                    Ok(route) => route,
                    Err(err) => {
                        warn!(
                            store = %entry.candidate.name,
                            error = %err,
                            "route enrichment failed, returning distance only"
                        );
                        None
                    }
                };
                StoreMatch {
                    store: entry.candidate,
                    distance_km: entry.distance_km,
                    route,
                }
            })
            .collect();

        Ok(SearchOutcome { origin, matches })
    }
}
