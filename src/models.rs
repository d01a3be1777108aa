//! Store and delivery-fee records.
//!
//! Records come in two halves: the `New*` input types carry caller-supplied
//! fields, while the full records add storage-assigned identity, derived
//! normalized keys, and the creation timestamp. The normalized keys exist
//! only for duplicate detection and loose search matching.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Point;
use crate::normalize::{normalize, normalize_opt};
use crate::traits::Candidate;

/// Operating status of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreStatus {
    Operational,
    TemporarilyClosed,
    PermanentlyClosed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown store status `{0}`")]
pub struct UnknownStatus(pub String);

impl StoreStatus {
    /// Canonical display form, also the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Operational => "Operational",
            StoreStatus::TemporarilyClosed => "Temporarily Closed",
            StoreStatus::PermanentlyClosed => "Permanently Closed",
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Operational" => Ok(StoreStatus::Operational),
            "Temporarily Closed" => Ok(StoreStatus::TemporarilyClosed),
            "Permanently Closed" => Ok(StoreStatus::PermanentlyClosed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Caller-supplied fields for creating or updating a store.
///
/// `location` is geocoded from the address by the caller before the record is
/// written; it is not typed in directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub location: Point,
    pub contact_number: Option<String>,
    pub supervisor: Option<String>,
    pub hours: Option<String>,
    pub status: Option<StoreStatus>,
    pub category: Option<String>,
    pub pin_location: Option<String>,
}

impl NewStore {
    /// Normalized (name, address) pair used for duplicate detection.
    pub fn normalized_key(&self) -> (String, String) {
        (normalize(&self.name), normalize(&self.address))
    }

    pub(crate) fn normalized_category(&self) -> Option<String> {
        normalize_opt(self.category.as_deref())
    }
}

/// A persisted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// Storage-assigned identity, immutable.
    pub id: i64,
    pub name: String,
    pub address: String,
    pub location: Point,
    pub contact_number: Option<String>,
    pub supervisor: Option<String>,
    pub hours: Option<String>,
    pub status: Option<StoreStatus>,
    pub category: Option<String>,
    /// Secondary free-text location hint (plus code or map pin name).
    pub pin_location: Option<String>,
    pub normalized_name: String,
    pub normalized_address: String,
    pub normalized_category: Option<String>,
    /// Unix seconds, assigned at creation, immutable.
    pub created_at: i64,
}

impl Candidate for StoreRecord {
    fn location(&self) -> Point {
        self.location
    }

    fn category_key(&self) -> Option<&str> {
        self.normalized_category.as_deref()
    }
}

/// Caller-supplied fields for a delivery-fee entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeliveryFee {
    pub location: String,
    /// Optional sub-area; empty means the whole location.
    pub zone: String,
    pub min_order_amount: Decimal,
    pub delivery_charge: Decimal,
    /// Order value from which delivery is free; zero means no free tier.
    pub amount_for_free_delivery: Decimal,
}

impl NewDeliveryFee {
    /// Normalized (location, zone) pair used for duplicate detection. An
    /// empty zone normalizes to the empty key.
    pub fn normalized_key(&self) -> (String, String) {
        (normalize(&self.location), normalize(&self.zone))
    }
}

/// A persisted delivery-fee entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFeeRecord {
    pub id: i64,
    pub location: String,
    pub zone: String,
    pub min_order_amount: Decimal,
    pub delivery_charge: Decimal,
    pub amount_for_free_delivery: Decimal,
    pub normalized_location: String,
    pub normalized_zone: String,
    pub created_at: i64,
}

/// Outcome of applying a fee entry to an order value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryQuote {
    /// Order qualifies for free delivery.
    Free,
    /// Flat delivery charge applies.
    Charged(Decimal),
    /// Order is below the minimum; `shortfall` is what's missing.
    BelowMinimum { shortfall: Decimal },
}

impl DeliveryFeeRecord {
    /// Applies this entry's thresholds to an order value.
    pub fn charge_for_order(&self, order_amount: Decimal) -> DeliveryQuote {
        if order_amount < self.min_order_amount {
            return DeliveryQuote::BelowMinimum {
                shortfall: self.min_order_amount - order_amount,
            };
        }
        if self.amount_for_free_delivery > Decimal::ZERO
            && order_amount >= self.amount_for_free_delivery
        {
            return DeliveryQuote::Free;
        }
        DeliveryQuote::Charged(self.delivery_charge)
    }
}
