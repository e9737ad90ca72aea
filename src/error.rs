//! Pipeline error types
//!
//! A failure at any stage aborts the whole computation. No stage swallows
//! an error or returns a partial result: percentile bands over an
//! incomplete path set would be statistically misleading.

use thiserror::Error;

/// Errors surfaced by the dashboard pipeline
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Upstream fetch failed or returned fewer points than requested
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    /// Fewer than two historical closes; no return can be computed
    #[error("insufficient history: got {0} closes, need at least 2")]
    InsufficientData(usize),

    /// A non-positive or non-finite close would make the simple return undefined
    #[error("invalid close price {value} at index {index}")]
    InvalidPrice { index: usize, value: f64 },

    /// Malformed horizon, simulation count, or percentile level
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Caller aborted via the cancellation token
    #[error("computation cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::DataUnavailable(err.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
