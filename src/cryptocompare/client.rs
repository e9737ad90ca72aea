//! CryptoCompare min-api client
//!
//! HTTP client for the public CryptoCompare endpoints the dashboard reads:
//! daily close history and the spot market snapshot. Includes retry with
//! exponential backoff, token-bucket rate limiting, and a circuit breaker;
//! no API key is required, but one raises the free-tier quota.
//!
//! # Example
//!
//! ```no_run
//! use crypto_dashboard::cryptocompare::CryptoCompareClient;
//! use crypto_dashboard::history::HistoryFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CryptoCompareClient::new();
//!     let series = client.fetch_history("BTC", "USD", 30).await?;
//!     println!("Fetched {} daily closes", series.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::types::{HistoDayEntry, HistoDayResponse, PriceMultiFullResponse};
use crate::common::{CircuitBreaker, RateLimiter};
use crate::config::ApiConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::history::HistoryFetcher;
use crate::types::{CoinQuote, PricePoint, PriceSeries, Symbol};

/// Base URL for the CryptoCompare min-api
pub const API_BASE_URL: &str = "https://min-api.cryptocompare.com/data";

/// Consecutive failed requests before the circuit opens
const FAILURE_THRESHOLD: u32 = 5;

/// How long an open circuit rejects requests before probing again
const CIRCUIT_COOLDOWN: Duration = Duration::from_secs(60);

/// CryptoCompare API client
#[derive(Debug)]
pub struct CryptoCompareClient {
    http: Client,
    api_key: Option<String>,
    max_retries: u32,
    rate_limiter: RateLimiter,
    circuit_breaker: Arc<Mutex<CircuitBreaker>>,
}

impl Default for CryptoCompareClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoCompareClient {
    /// Create a client with default settings and no API key
    pub fn new() -> Self {
        Self::with_config(&ApiConfig::default())
    }

    /// Create a client from the dashboard API configuration
    pub fn with_config(config: &ApiConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        CryptoCompareClient {
            http,
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
            rate_limiter: RateLimiter::per_second(config.requests_per_second),
            circuit_breaker: Arc::new(Mutex::new(CircuitBreaker::new(
                FAILURE_THRESHOLD,
                CIRCUIT_COOLDOWN,
            ))),
        }
    }

    /// Attach an API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Fetch `days` daily OHLC buckets ending today.
    ///
    /// The endpoint returns `limit + 1` buckets, so `limit` is `days - 1`.
    pub async fn histo_day(
        &self,
        symbol: &str,
        currency: &str,
        days: u32,
    ) -> DashboardResult<Vec<HistoDayEntry>> {
        if days < 2 {
            return Err(DashboardError::InvalidParameters(format!(
                "lookback of {days} days is too short, need at least 2"
            )));
        }

        let params = [
            ("fsym", symbol.to_uppercase()),
            ("tsym", currency.to_uppercase()),
            ("limit", (days - 1).to_string()),
        ];
        let response: HistoDayResponse = self.request_with_retry("/v2/histoday", &params).await?;

        if !response.is_success() {
            let message = if response.message.is_empty() {
                "unknown provider error".to_string()
            } else {
                response.message
            };
            return Err(DashboardError::DataUnavailable(message));
        }

        Ok(response.data.map(|d| d.entries).unwrap_or_default())
    }

    /// Fetch the spot snapshot for a set of coins.
    ///
    /// Coins the provider does not report are skipped with a warning rather
    /// than failing the whole snapshot.
    pub async fn price_snapshot(
        &self,
        symbols: &[String],
        currency: &str,
    ) -> DashboardResult<Vec<CoinQuote>> {
        if symbols.is_empty() {
            return Err(DashboardError::InvalidParameters(
                "at least one symbol is required".to_string(),
            ));
        }

        let currency = currency.to_uppercase();
        let fsyms = symbols
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");
        let params = [("fsyms", fsyms), ("tsyms", currency.clone())];
        let response: PriceMultiFullResponse =
            self.request_with_retry("/pricemultifull", &params).await?;

        let mut quotes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let upper = symbol.to_uppercase();
            match response.raw.get(&upper).and_then(|q| q.get(&currency)) {
                Some(raw) => quotes.push(CoinQuote {
                    symbol: Symbol::new(upper),
                    price: raw.price,
                    change_24h: raw.change_24h,
                    market_cap: raw.market_cap,
                    volume_24h: raw.volume_24h,
                    supply: raw.supply,
                }),
                None => warn!(symbol = %upper, "no quote in provider snapshot, skipping"),
            }
        }

        if quotes.is_empty() {
            return Err(DashboardError::DataUnavailable(
                "provider returned no quotes for the requested symbols".to_string(),
            ));
        }
        Ok(quotes)
    }

    /// Execute a GET with circuit breaking, rate limiting, and retries
    async fn request_with_retry<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> DashboardResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        {
            let mut cb = self.circuit_breaker.lock().await;
            if !cb.can_attempt() {
                return Err(DashboardError::DataUnavailable(
                    "provider circuit breaker is open".to_string(),
                ));
            }
        }

        self.rate_limiter.acquire().await;

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s...
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                debug!(path, delay_ms = delay.as_millis() as u64, "retrying request");
                sleep(delay).await;
            }

            match self.get_json(path, params).await {
                Ok(value) => {
                    self.circuit_breaker.lock().await.record_success();
                    return Ok(value);
                }
                Err(e) => {
                    warn!(
                        path,
                        attempt = attempt + 1,
                        attempts = self.max_retries + 1,
                        error = %e,
                        "request failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        self.circuit_breaker.lock().await.record_failure();
        Err(last_error.unwrap_or_else(|| {
            DashboardError::DataUnavailable(format!("request to {path} failed"))
        }))
    }

    async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> DashboardResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{API_BASE_URL}{path}");
        let mut request = self.http.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::DataUnavailable(format!(
                "provider returned HTTP {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DashboardError::DataUnavailable(format!("malformed provider response: {e}")))
    }
}

#[async_trait]
impl HistoryFetcher for CryptoCompareClient {
    async fn fetch_history(
        &self,
        symbol: &str,
        currency: &str,
        days: u32,
    ) -> DashboardResult<PriceSeries> {
        let entries = self.histo_day(symbol, currency, days).await?;
        if entries.len() != days as usize {
            return Err(DashboardError::DataUnavailable(format!(
                "expected {days} daily closes for {symbol}, got {}",
                entries.len()
            )));
        }

        let points = entries
            .iter()
            .map(|e| PricePoint::new(e.time, e.close))
            .collect();
        PriceSeries::new(points)
    }
}
