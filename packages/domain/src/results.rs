use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::Listing;

/// Outcome of one acquisition call against the listing source.
///
/// `Blocked` is session-fatal and must abort the whole run; `Empty` is a
/// normal result the caller folds into a smaller report.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Listings(Vec<Listing>),
    Blocked,
    Empty,
}

/// Filter predicates, in the fixed order they are evaluated and reported.
///
/// The order is part of the contract: failure lists and reasons come out in
/// this order, which keeps reports and test assertions deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    MaxDeposit,
    MaxMonthlyRent,
    MaxMaintenanceFee,
    MinAreaSqm,
    MaxAreaSqm,
    MinHouseholds,
    MinBuiltYear,
    MaxBuiltYear,
    MinFloor,
    MaxFloor,
    RequireParking,
    RequireElevator,
    Regions,
    PropertyTypes,
}

impl FilterField {
    pub const ORDERED: [FilterField; 14] = [
        FilterField::MaxDeposit,
        FilterField::MaxMonthlyRent,
        FilterField::MaxMaintenanceFee,
        FilterField::MinAreaSqm,
        FilterField::MaxAreaSqm,
        FilterField::MinHouseholds,
        FilterField::MinBuiltYear,
        FilterField::MaxBuiltYear,
        FilterField::MinFloor,
        FilterField::MaxFloor,
        FilterField::RequireParking,
        FilterField::RequireElevator,
        FilterField::Regions,
        FilterField::PropertyTypes,
    ];

    /// Criteria field name, as it appears in `must_conditions`.
    pub fn name(self) -> &'static str {
        match self {
            FilterField::MaxDeposit => "max_deposit",
            FilterField::MaxMonthlyRent => "max_monthly_rent",
            FilterField::MaxMaintenanceFee => "max_maintenance_fee",
            FilterField::MinAreaSqm => "min_area_sqm",
            FilterField::MaxAreaSqm => "max_area_sqm",
            FilterField::MinHouseholds => "min_households",
            FilterField::MinBuiltYear => "min_built_year",
            FilterField::MaxBuiltYear => "max_built_year",
            FilterField::MinFloor => "min_floor",
            FilterField::MaxFloor => "max_floor",
            FilterField::RequireParking => "require_parking",
            FilterField::RequireElevator => "require_elevator",
            FilterField::Regions => "regions",
            FilterField::PropertyTypes => "property_types",
        }
    }

    /// Inverse of [`name`](Self::name); unknown names yield `None` and are
    /// ignored by callers rather than raised.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDERED.iter().copied().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStatus {
    Pass,
    PartialPass,
    Fail,
}

/// Per-listing filter verdict with per-field evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResult {
    pub listing_id: String,
    pub status: FilterStatus,
    pub passed: Vec<FilterField>,
    pub failed: Vec<FilterField>,
    /// `(field, reason)` pairs in evaluation order. The commute stage may
    /// append one more pair during filter pass 2.
    pub reasons: Vec<(FilterField, String)>,
    /// Extra failure reasons that are not filter-engine fields (commute).
    pub extra_failures: Vec<(String, String)>,
}

impl FilterResult {
    pub fn failure_reasons(&self) -> impl Iterator<Item = &str> {
        self.reasons
            .iter()
            .map(|(_, r)| r.as_str())
            .chain(self.extra_failures.iter().map(|(_, r)| r.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub category: String,
    pub score: f64,
    pub max_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub listing_id: String,
    /// 0–100.
    pub total: f64,
    /// 1-based, assigned by the report assembler.
    pub rank: Option<u32>,
    pub breakdown: Vec<ScoreBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Info,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskItem {
    pub category: String,
    pub level: RiskLevel,
    pub title: String,
    pub description: String,
    pub check_action: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskResult {
    pub listing_id: String,
    /// 0–100, higher is riskier.
    pub risk_score: u32,
    pub risks: Vec<RiskItem>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub listing_id: String,
    pub questions: Vec<String>,
    /// `(question, why it matters)` in question order.
    pub reasons: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteResult {
    pub listing_id: String,
    /// `None` when the route lookup failed; treated as provisionally passing.
    pub minutes: Option<u32>,
    pub transfers: Option<u32>,
    pub path_kind: Option<String>,
    pub passed: bool,
}

/// Everything the pipeline learned about one listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingReport {
    pub listing: Listing,
    pub filter: Option<FilterResult>,
    pub score: Option<ScoreResult>,
    pub risk: Option<RiskResult>,
    pub questions: Option<QuestionResult>,
    pub commute: Option<CommuteResult>,
}

/// Final pipeline output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub created_at: DateTime<Utc>,
    pub total_count: usize,
    pub passed_count: usize,
    /// Passed listings, best first. Ranks are 1-based and sequential;
    /// score ties keep original acquisition order.
    pub ranked: Vec<ListingReport>,
    pub filtered_out: Vec<ListingReport>,
    pub summary: String,
    pub insights: Vec<String>,
}

impl Report {
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            total_count: 0,
            passed_count: 0,
            ranked: Vec::new(),
            filtered_out: Vec::new(),
            summary: summary.into(),
            insights: vec!["검색 결과가 없습니다.".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_field_name_roundtrip() {
        for field in FilterField::ORDERED {
            assert_eq!(FilterField::from_name(field.name()), Some(field));
        }
        assert_eq!(FilterField::from_name("max_commute_minutes"), None);
        assert_eq!(FilterField::from_name("nonsense"), None);
    }
}
