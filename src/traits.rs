//! Collaborator seams for the locator.
//!
//! The resolver and the search orchestration are generic over these traits so
//! hosts can plug in their own record types and tests can swap the HTTP
//! adapters for in-memory fakes.

use crate::directions::{DirectionsError, Route};
use crate::geo::Point;
use crate::geocode::GeocodeError;

/// A record considered during nearest-resolution ranking.
pub trait Candidate {
    /// Coordinate of the record.
    fn location(&self) -> Point;

    /// Normalized category key, if the record carries one.
    fn category_key(&self) -> Option<&str>;
}

/// Resolves free-text addresses to coordinates.
///
/// `Ok(None)` means the address was not found, a user-facing outcome kept
/// distinct from transport or provider errors.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Option<Point>, GeocodeError>;
}

/// Produces a road route between two coordinates.
///
/// `Ok(None)` means no route exists (unreachable or coincident locations),
/// which is a normal outcome rather than an error.
pub trait DirectionsProvider {
    fn route(&self, origin: Point, destination: Point) -> Result<Option<Route>, DirectionsError>;
}
