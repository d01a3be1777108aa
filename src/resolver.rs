//! Nearest-entity resolution: rank candidates by great-circle distance.

use rayon::prelude::*;

use crate::geo::{Point, haversine_km};
use crate::normalize::normalize;
use crate::traits::Candidate;

/// Category restriction applied before ranking.
///
/// Built from raw filter text with [`CategoryFilter::parse`], which treats the
/// "all" sentinels as no filter and normalizes everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// Normalized category key that candidates must match exactly.
    Category(String),
}

impl CategoryFilter {
    /// Parses raw filter text. Empty input and the "all"/"all stores"
    /// sentinels mean no restriction.
    pub fn parse(raw: &str) -> Self {
        let key = normalize(raw);
        match key.as_str() {
            "" | "all" | "all stores" => CategoryFilter::All,
            _ => CategoryFilter::Category(key),
        }
    }

    fn matches(&self, candidate_key: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(key) => candidate_key == Some(key.as_str()),
        }
    }
}

/// A candidate paired with its distance from the search origin.
#[derive(Debug, Clone)]
pub struct Ranked<'a, C> {
    pub candidate: &'a C,
    pub distance_km: f64,
}

/// Returns the `k` candidates closest to `origin`, ascending by distance.
///
/// Candidates failing the category filter are dropped before ranking. Exact
/// distance ties keep input order (the sort is stable), so results are
/// deterministic. Fewer than `k` survivors (including zero) is a normal
/// outcome. Purely computational: no I/O, no shared state.
pub fn find_nearest<'a, C>(
    origin: Point,
    candidates: &'a [C],
    filter: &CategoryFilter,
    k: usize,
) -> Vec<Ranked<'a, C>>
where
    C: Candidate + Sync,
{
    let mut ranked: Vec<Ranked<'a, C>> = candidates
        .par_iter()
        .filter(|candidate| filter.matches(candidate.category_key()))
        .map(|candidate| Ranked {
            candidate,
            distance_km: haversine_km(origin, candidate.location()),
        })
        .collect();

    // Coordinates are finite by construction, so total_cmp never sees NaN.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    ranked
}
