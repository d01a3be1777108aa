//! Test fixtures for store-locator.
//!
//! Provides realistic test data: real Dubai-area locations and builders for
//! store records and inputs.

pub mod dubai_locations;

pub use dubai_locations::*;
