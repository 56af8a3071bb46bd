use thiserror::Error;

pub type Result<T> = std::result::Result<T, LandError>;

#[derive(Debug, Error)]
pub enum LandError {
    /// The listing source rejected this session. Sticky: once raised, every
    /// later call on the same client fails with this before any network I/O.
    #[error("listing source blocked this session; retry much later")]
    Blocked,

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Region name or code outside the known tables
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// Response body was not the JSON shape we expect
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cache directory could not be created
    #[error("cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),
}
