use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The listing source blocked the session mid-run. Unlike an empty
    /// search this is fatal: continuing would only dig the block deeper.
    #[error("listing source blocked the session; stop and retry much later")]
    SourceBlocked,
}
