//! In-memory stand-ins for the external clients, for tests that exercise
//! the pipeline end to end without network access.

use std::collections::HashMap;

use async_trait::async_trait;

use domain::{Listing, SearchOutcome, UserCriteria};
use molit_client::PriceAnalysis;
use transit_client::TransitRoute;

use crate::traits::{ListingSearch, PriceHistory, TransitRoutes};

/// Serves a canned outcome per region code; unknown regions come up empty.
#[derive(Default)]
pub struct FixedSearch {
    outcomes: HashMap<String, Vec<Listing>>,
}

impl FixedSearch {
    pub fn with_region(mut self, code: &str, listings: Vec<Listing>) -> Self {
        self.outcomes.insert(code.to_string(), listings);
        self
    }
}

#[async_trait]
impl ListingSearch for FixedSearch {
    async fn search_by_region(
        &self,
        region_code: &str,
        _criteria: &UserCriteria,
        max_items: usize,
    ) -> SearchOutcome {
        match self.outcomes.get(region_code) {
            Some(listings) if !listings.is_empty() => {
                let mut batch = listings.clone();
                batch.truncate(max_items);
                SearchOutcome::Listings(batch)
            }
            _ => SearchOutcome::Empty,
        }
    }
}

/// Always blocked, for abort-path tests.
pub struct BlockedSearch;

#[async_trait]
impl ListingSearch for BlockedSearch {
    async fn search_by_region(
        &self,
        _region_code: &str,
        _criteria: &UserCriteria,
        _max_items: usize,
    ) -> SearchOutcome {
        SearchOutcome::Blocked
    }
}

/// No transaction history for anything.
#[derive(Default)]
pub struct NoPrices;

#[async_trait]
impl PriceHistory for NoPrices {
    async fn preload_region(&self, _sigungu_code: &str, _months: u32) {}

    async fn price_analysis(
        &self,
        _sigungu_code: &str,
        _complex_name: &str,
        _area_sqm: f64,
        _current_deposit: i64,
        _months: u32,
    ) -> PriceAnalysis {
        PriceAnalysis::default()
    }
}

/// Serves a fixed analysis for one complex name, nothing for the rest.
pub struct ComplexPrices {
    pub complex_name: String,
    pub analysis: PriceAnalysis,
}

#[async_trait]
impl PriceHistory for ComplexPrices {
    async fn preload_region(&self, _sigungu_code: &str, _months: u32) {}

    async fn price_analysis(
        &self,
        _sigungu_code: &str,
        complex_name: &str,
        _area_sqm: f64,
        _current_deposit: i64,
        _months: u32,
    ) -> PriceAnalysis {
        if complex_name == self.complex_name {
            self.analysis.clone()
        } else {
            PriceAnalysis::default()
        }
    }
}

/// Routes keyed by the origin coordinate, rounded to 4 decimal places so
/// listings land on distinct keys without float-equality headaches.
#[derive(Default)]
pub struct MappedTransit {
    routes: HashMap<(i64, i64), TransitRoute>,
}

impl MappedTransit {
    pub fn with_route(mut self, origin: (f64, f64), minutes: u32) -> Self {
        self.routes.insert(
            Self::key(origin),
            TransitRoute {
                total_minutes: minutes,
                walk_minutes: 5,
                transfers: 1,
                path_kind: "지하철".to_string(),
            },
        );
        self
    }

    fn key((lat, lng): (f64, f64)) -> (i64, i64) {
        ((lat * 10_000.0).round() as i64, (lng * 10_000.0).round() as i64)
    }
}

#[async_trait]
impl TransitRoutes for MappedTransit {
    async fn transit_route(&self, start: (f64, f64), _end: (f64, f64)) -> Option<TransitRoute> {
        self.routes.get(&Self::key(start)).cloned()
    }
}
