//! Real Dubai-area locations for realistic test fixtures.
//!
//! Coordinates are real landmarks and neighborhoods, so distance assertions
//! can be checked against a map.

use store_locator::geo::Point;
use store_locator::models::{NewStore, StoreRecord, StoreStatus};
use store_locator::normalize::{normalize, normalize_opt};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lon).expect("fixture coordinates are valid")
    }
}

/// Downtown Dubai, near Burj Khalifa. The usual search origin.
pub const DOWNTOWN_USER: Location = Location::new("Downtown Dubai", 25.1972, 55.2744);

pub const BRANCHES: &[(Location, &str)] = &[
    (
        Location::new("Financial Centre Branch", 25.2048, 55.2708),
        "Smart Seven",
    ),
    (Location::new("Al Barsha Branch", 25.0772, 55.1395), "KCC"),
    (Location::new("Deira Branch", 25.2532, 55.3657), "KCC"),
    (
        Location::new("Jumeirah Branch", 25.2106, 55.2593),
        "Smart Seven",
    ),
];

/// Builds a full store record the way the storage layer would, with derived
/// normalized keys filled in.
pub fn store_record(id: i64, location: &Location, category: &str) -> StoreRecord {
    StoreRecord {
        id,
        name: location.name.to_string(),
        address: format!("{}, Dubai", location.name),
        location: location.point(),
        contact_number: Some("+971 4 123 4567".to_string()),
        supervisor: None,
        hours: Some("9 AM - 10 PM".to_string()),
        status: Some(StoreStatus::Operational),
        category: Some(category.to_string()),
        pin_location: None,
        normalized_name: normalize(location.name),
        normalized_address: normalize(&format!("{}, Dubai", location.name)),
        normalized_category: normalize_opt(Some(category)),
        created_at: 1_700_000_000,
    }
}

/// The standard four-branch snapshot used across scenario tests.
pub fn branch_snapshot() -> Vec<StoreRecord> {
    BRANCHES
        .iter()
        .enumerate()
        .map(|(index, (location, category))| store_record(index as i64 + 1, location, category))
        .collect()
}

/// Input half of a store record, for persistence tests.
pub fn new_store(location: &Location, category: &str) -> NewStore {
    NewStore {
        name: location.name.to_string(),
        address: format!("{}, Dubai", location.name),
        location: location.point(),
        contact_number: Some("+971 4 123 4567".to_string()),
        supervisor: Some("R. Dela Cruz".to_string()),
        hours: Some("9 AM - 10 PM".to_string()),
        status: Some(StoreStatus::Operational),
        category: Some(category.to_string()),
        pin_location: None,
    }
}
