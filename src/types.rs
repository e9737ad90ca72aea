//! Core data types used across the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Cryptocurrency symbol (e.g. "BTC")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Symbol(s.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single daily close observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, close: f64) -> Self {
        PricePoint { timestamp, close }
    }

    /// Timestamp as a chrono instant, for display layers
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Ordered daily close series, strictly increasing in timestamp.
///
/// Owned by the pipeline invocation that fetched it; nothing is shared or
/// cached across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or duplicate timestamps
    pub fn new(points: Vec<PricePoint>) -> DashboardResult<Self> {
        for pair in points.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(DashboardError::InvalidParameters(format!(
                    "series timestamps must be strictly increasing, got {} then {}",
                    pair[0].timestamp, pair[1].timestamp
                )));
            }
        }
        Ok(PriceSeries { points })
    }

    /// Build from parallel timestamp/close slices
    pub fn from_pairs(timestamps: &[i64], closes: &[f64]) -> DashboardResult<Self> {
        if timestamps.len() != closes.len() {
            return Err(DashboardError::InvalidParameters(format!(
                "timestamp/close length mismatch: {} vs {}",
                timestamps.len(),
                closes.len()
            )));
        }
        let points = timestamps
            .iter()
            .zip(closes)
            .map(|(&t, &c)| PricePoint::new(t, c))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Random-walk model derived from a price series: mean and population
/// standard deviation of simple daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnModel {
    pub mean: f64,
    pub stddev: f64,
    /// Number of returns the moments were computed over (`series.len() - 1`)
    pub basis_count: usize,
}

/// Per-period quantile values for one percentile level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    /// Quantile level in the open interval (0, 1)
    pub level: f64,
    /// One value per future period, in period order
    pub values: Vec<f64>,
}

/// Projected cone of future prices: timestamps plus percentile bands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    /// Future timestamps, `last_historical + k * period_length` for k = 1..H
    pub timestamps: Vec<i64>,
    /// Bands in the order the levels were requested
    pub bands: Vec<PercentileBand>,
}

/// Final fan chart output: observed history plus the projected cone.
///
/// Constructed once per invocation and handed to the rendering layer as
/// plain data: `historical` maps to a solid line, each band to a shaded
/// ribbon keyed by its level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanChartResult {
    pub symbol: Symbol,
    pub currency: String,
    pub historical: PriceSeries,
    pub projection: Projection,
}

/// Spot market snapshot for one coin, from the price-multi-full endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinQuote {
    pub symbol: Symbol,
    pub price: f64,
    /// Absolute 24h change in quote currency, when the provider reports it
    pub change_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub supply: Option<f64>,
}
