//! Client for the mobile apartment-listing API.
//!
//! Designed around one constraint: the upstream actively blocks scrapers.
//! Every request is paced with a randomized delay, block signals (403/429/
//! 503 or HTML instead of JSON) latch a sticky session flag, and successful
//! region searches are cached on disk so repeat runs within the TTL cost
//! zero requests.

pub mod cache;
pub mod client;
pub mod error;
pub mod matching;
pub mod parse;
pub mod types;

pub use cache::{CacheEntryInfo, CacheStats, ResponseCache};
pub use client::{LandClient, LandConfig};
pub use error::{LandError, Result};
pub use types::RegionComplex;
