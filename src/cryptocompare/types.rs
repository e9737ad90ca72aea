//! CryptoCompare API response envelopes
//!
//! The min-api wraps `/data/v2/*` payloads in a `Response`/`Message`
//! envelope and reports errors with HTTP 200, so the envelope has to be
//! inspected even on success status codes.

use serde::Deserialize;
use std::collections::HashMap;

/// Envelope for `/data/v2/histoday`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoDayResponse {
    #[serde(rename = "Response", default)]
    pub response: String,
    /// Human-readable error detail on failure
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Option<HistoDayData>,
}

impl HistoDayResponse {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("Success")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoDayData {
    #[serde(rename = "Data", default)]
    pub entries: Vec<HistoDayEntry>,
}

/// One daily OHLC bucket
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HistoDayEntry {
    /// Bucket open, seconds since the Unix epoch
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(rename = "volumefrom", default)]
    pub volume_from: f64,
    #[serde(rename = "volumeto", default)]
    pub volume_to: f64,
}

/// Envelope for `/data/pricemultifull`: coin symbol -> quote currency -> quote
#[derive(Debug, Clone, Deserialize)]
pub struct PriceMultiFullResponse {
    #[serde(rename = "RAW", default)]
    pub raw: HashMap<String, HashMap<String, RawQuote>>,
}

/// Raw per-coin quote fields used by the dashboard
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawQuote {
    #[serde(rename = "PRICE")]
    pub price: f64,
    #[serde(rename = "CHANGE24HOUR", default)]
    pub change_24h: Option<f64>,
    #[serde(rename = "MKTCAP", default)]
    pub market_cap: Option<f64>,
    #[serde(rename = "TOTALVOLUME24H", default)]
    pub volume_24h: Option<f64>,
    #[serde(rename = "SUPPLY", default)]
    pub supply: Option<f64>,
}
