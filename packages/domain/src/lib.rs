//! Shared domain model for the apartment-hunting analysis pipeline.
//!
//! Pure data: listings, user criteria, per-stage result types, and the
//! region-code tables shared by the acquisition and enrichment layers.
//! No I/O lives here.

pub mod criteria;
pub mod listing;
pub mod regions;
pub mod results;

pub use criteria::{PropertyType, TransactionType, UserCriteria, MUST_COMMUTE};
pub use listing::{Listing, ListingSource};
pub use results::{
    CommuteResult, FilterField, FilterResult, FilterStatus, ListingReport, QuestionResult,
    Report, RiskItem, RiskLevel, RiskResult, ScoreBreakdown, ScoreResult, SearchOutcome,
};
