//! Client for the Ministry of Land real-transaction price API.
//!
//! Answers one question for the risk stage: how does this listing's
//! deposit compare to what the complex actually trades and rents for?
//! Degrades to "unknown" on every upstream failure; a missing answer is
//! reported as missing, never as low risk.

pub mod client;
pub mod types;
pub mod xml;

pub use client::{MolitClient, MolitConfig};
pub use types::{
    JeonseRatioAnalysis, PriceAnalysis, PriceEvaluation, PriceRecord, PriceStats, RiskTier,
};
