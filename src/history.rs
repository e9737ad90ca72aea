//! History provider contract
//!
//! The pipeline only depends on this trait; the production implementation
//! is [`crate::cryptocompare::CryptoCompareClient`], and tests inject an
//! in-memory double. Retry policy belongs to the implementor, never to the
//! pipeline.

use async_trait::async_trait;

use crate::error::DashboardResult;
use crate::types::PriceSeries;

/// Source of daily historical closes for a symbol
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// Fetch exactly `days` daily closes for `symbol` quoted in `currency`.
    ///
    /// Implementations fail with `DataUnavailable` on network or provider
    /// errors, unknown symbols, or when fewer than `days` points come back.
    async fn fetch_history(
        &self,
        symbol: &str,
        currency: &str,
        days: u32,
    ) -> DashboardResult<PriceSeries>;
}
