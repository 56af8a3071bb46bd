//! The staged analysis pipeline.
//!
//! Stage order matters: price enrichment runs straight after acquisition,
//! on the raw listings, so the jeonse-ratio notes exist before anything
//! else looks at the text; normalization runs before filtering so region
//! and area checks see backfilled fields; the commute stage runs only over
//! listings the cheap filters already accepted. Risk detection and
//! question generation run over every listing, rejected ones included, so
//! the report can still say why a listing looked risky. Only scoring is
//! limited to survivors.

use std::collections::HashSet;
use std::sync::Arc;

use domain::{
    regions, FilterStatus, Listing, ListingReport, Report, SearchOutcome, TransactionType,
    UserCriteria, MUST_COMMUTE,
};

use crate::error::PipelineError;
use crate::risk::RiskEngine;
use crate::traits::{ListingSearch, PriceHistory, TransitRoutes};
use crate::{commute, enrich, filter, normalize, question, report, score};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Listing cap per searched region.
    pub max_items_per_region: usize,
    /// Transaction-history window for price enrichment.
    pub price_months: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_items_per_region: 50,
            price_months: 6,
        }
    }
}

pub struct Pipeline {
    search: Arc<dyn ListingSearch>,
    prices: Arc<dyn PriceHistory>,
    transit: Arc<dyn TransitRoutes>,
    risk_engine: RiskEngine,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn ListingSearch>,
        prices: Arc<dyn PriceHistory>,
        transit: Arc<dyn TransitRoutes>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            search,
            prices,
            transit,
            risk_engine: RiskEngine::new(),
            config,
        }
    }

    /// Run every stage over the user's regions and return the final report.
    ///
    /// A blocked listing source aborts the whole run: partial results from
    /// a session the source has flagged are worse than none.
    pub async fn run(&self, criteria: &UserCriteria) -> Result<Report, PipelineError> {
        let listings = self.acquire(criteria).await?;
        if listings.is_empty() {
            return Ok(Report::empty("조건에 맞는 매물을 찾지 못했습니다."));
        }
        Ok(self.analyze(listings, criteria).await)
    }

    /// Analyze listings obtained elsewhere (CSV import, a previous run).
    pub async fn analyze(&self, mut listings: Vec<Listing>, criteria: &UserCriteria) -> Report {
        if criteria.transaction_type == TransactionType::Jeonse {
            self.enrich_with_prices(&mut listings, criteria).await;
        }

        for listing in &mut listings {
            normalize::normalize(listing);
        }

        // pass 1: everything except the commute bound
        let relaxed = criteria.without_commute_must();
        let mut reports: Vec<ListingReport> = listings
            .into_iter()
            .map(|listing| {
                let filter = filter::evaluate(&listing, &relaxed);
                ListingReport {
                    listing,
                    filter: Some(filter),
                    score: None,
                    risk: None,
                    questions: None,
                    commute: None,
                }
            })
            .collect();

        // pass 2: paid commute lookups over survivors only
        for entry in &mut reports {
            let survived = entry
                .filter
                .as_ref()
                .is_some_and(|f| f.status != FilterStatus::Fail);
            if !survived {
                continue;
            }
            let Some(result) = commute::check(&mut entry.listing, criteria, &*self.transit).await
            else {
                continue;
            };
            if !result.passed {
                if let (Some(minutes), Some(max), Some(filter)) = (
                    result.minutes,
                    criteria.max_commute_minutes,
                    entry.filter.as_mut(),
                ) {
                    filter.extra_failures.push((
                        MUST_COMMUTE.to_string(),
                        format!("통근 시간 {minutes}분 > 상한 {max}분"),
                    ));
                    filter.status = if criteria.is_must(MUST_COMMUTE) {
                        FilterStatus::Fail
                    } else {
                        FilterStatus::PartialPass
                    };
                }
            }
            entry.commute = Some(result);
        }

        // risk and questions cover rejected listings too; only the score
        // is reserved for survivors
        for entry in &mut reports {
            let survived = entry
                .filter
                .as_ref()
                .is_some_and(|f| f.status != FilterStatus::Fail);
            if survived {
                entry.score = Some(score::evaluate(&entry.listing, criteria));
            }
            let risk = self.risk_engine.evaluate(&entry.listing);
            entry.questions = Some(question::generate(&entry.listing, Some(&risk)));
            entry.risk = Some(risk);
        }

        report::assemble(reports)
    }

    async fn acquire(&self, criteria: &UserCriteria) -> Result<Vec<Listing>, PipelineError> {
        let mut listings: Vec<Listing> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for region in &criteria.regions {
            let Some(code) = regions::sigungu_code(region) else {
                tracing::warn!(region, "unknown region, skipping");
                continue;
            };
            let outcome = self
                .search
                .search_by_region(code, criteria, self.config.max_items_per_region)
                .await;
            match outcome {
                SearchOutcome::Blocked => return Err(PipelineError::SourceBlocked),
                SearchOutcome::Empty => {
                    tracing::info!(region, "no listings found");
                }
                SearchOutcome::Listings(batch) => {
                    tracing::info!(region, count = batch.len(), "listings acquired");
                    for listing in batch {
                        // first-seen wins across overlapping regions
                        if seen.insert(listing.id.clone()) {
                            listings.push(listing);
                        }
                    }
                }
            }
        }
        Ok(listings)
    }

    async fn enrich_with_prices(&self, listings: &mut [Listing], criteria: &UserCriteria) {
        let months = self.config.price_months;

        let mut codes: Vec<&'static str> = Vec::new();
        for listing in listings.iter() {
            if let Some(code) = listing.region_gu.as_deref().and_then(regions::sigungu_code) {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
        for code in regions::sigungu_codes(&criteria.regions) {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        for code in &codes {
            self.prices.preload_region(code, months).await;
        }

        for listing in listings.iter_mut() {
            let Some(code) = listing
                .region_gu
                .as_deref()
                .and_then(regions::sigungu_code)
                .or_else(|| criteria.regions.first().and_then(|r| regions::sigungu_code(r)))
            else {
                continue;
            };
            let (Some(complex_name), Some(area), Some(deposit)) = (
                listing.complex_name.clone(),
                listing.area_sqm,
                listing.deposit,
            ) else {
                continue;
            };
            let analysis = self
                .prices
                .price_analysis(code, &complex_name, area, deposit, months)
                .await;
            enrich::apply(listing, &analysis, months);
        }
    }
}
