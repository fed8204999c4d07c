// Error taxonomy shared by the cache, registry and chart layers
use thiserror::Error;

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Failures surfaced by the analytics core.
///
/// Absence (a trial, source or dataset the server does not know about) is not
/// an error: loaders return `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing data: {0}")]
    MissingData(String),

    /// Transport or decoding failure reported by the data source.
    #[error("data source request failed: {0}")]
    Source(String),

    #[error("malformed payload: {0}")]
    Payload(String),
}

impl AnalyticsError {
    pub fn from_source(err: anyhow::Error) -> Self {
        Self::Source(format!("{err:#}"))
    }
}
