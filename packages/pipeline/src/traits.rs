//! Client seams the pipeline depends on.
//!
//! The orchestrator only ever talks to these traits; the real clients and
//! the test doubles in [`crate::testing`] both implement them.

use async_trait::async_trait;

use domain::{SearchOutcome, UserCriteria};
use land_client::LandClient;
use molit_client::{MolitClient, PriceAnalysis};
use transit_client::{TransitClient, TransitRoute};

#[async_trait]
pub trait ListingSearch: Send + Sync {
    async fn search_by_region(
        &self,
        region_code: &str,
        criteria: &UserCriteria,
        max_items: usize,
    ) -> SearchOutcome;
}

#[async_trait]
pub trait PriceHistory: Send + Sync {
    /// Warm the per-district record cache. Idempotent per district.
    async fn preload_region(&self, sigungu_code: &str, months: u32);

    async fn price_analysis(
        &self,
        sigungu_code: &str,
        complex_name: &str,
        area_sqm: f64,
        current_deposit: i64,
        months: u32,
    ) -> PriceAnalysis;
}

#[async_trait]
pub trait TransitRoutes: Send + Sync {
    async fn transit_route(&self, start: (f64, f64), end: (f64, f64)) -> Option<TransitRoute>;
}

#[async_trait]
impl ListingSearch for land_client::LandClient {
    async fn search_by_region(
        &self,
        region_code: &str,
        criteria: &UserCriteria,
        max_items: usize,
    ) -> SearchOutcome {
        LandClient::search_by_region(self, region_code, criteria, max_items).await
    }
}

#[async_trait]
impl PriceHistory for MolitClient {
    async fn preload_region(&self, sigungu_code: &str, months: u32) {
        MolitClient::preload_region(self, sigungu_code, months).await;
    }

    async fn price_analysis(
        &self,
        sigungu_code: &str,
        complex_name: &str,
        area_sqm: f64,
        current_deposit: i64,
        months: u32,
    ) -> PriceAnalysis {
        MolitClient::price_analysis(
            self,
            sigungu_code,
            complex_name,
            area_sqm,
            current_deposit,
            months,
        )
        .await
    }
}

#[async_trait]
impl TransitRoutes for TransitClient {
    async fn transit_route(&self, start: (f64, f64), end: (f64, f64)) -> Option<TransitRoute> {
        TransitClient::transit_route(self, start, end).await
    }
}
