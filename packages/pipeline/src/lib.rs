//! Rule engines and the staged analysis pipeline.
//!
//! The pipeline turns raw listings from the acquisition clients into a
//! ranked report: enrich with transaction history, normalize, filter,
//! check commutes, score, detect risks, generate viewing questions,
//! assemble. Everything external comes in through the traits in
//! [`traits`], so the whole pipeline runs against in-memory doubles in
//! tests.

pub mod commute;
pub mod enrich;
mod error;
pub mod filter;
pub(crate) mod fmt;
pub mod normalize;
mod orchestrator;
pub mod question;
pub mod report;
pub mod risk;
pub mod score;
pub mod testing;
pub mod traits;

pub use error::PipelineError;
pub use orchestrator::{Pipeline, PipelineConfig};
