//! Close-series analytics
//!
//! Display figures for the dashboard tabs: per-day percentage growth and
//! cross-symbol correlation. Both operate on already-fetched series with
//! the same price guards as the return estimator. Growth figures here are
//! simple percent differences for display; the fan-chart projection uses
//! its own return model and the two are intentionally not reconciled.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{DashboardError, DashboardResult};
use crate::types::{PriceSeries, Symbol};

/// Percentage change for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Timestamp of the day the change landed on
    pub timestamp: i64,
    pub pct_change: f64,
}

/// Day-over-day growth plus overall growth across the window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub daily: Vec<GrowthPoint>,
    /// Percentage change from the first close to the last
    pub overall_pct: f64,
}

/// Compute per-day percentage changes over the series.
pub fn daily_growth(series: &PriceSeries) -> DashboardResult<GrowthSummary> {
    if series.len() < 2 {
        return Err(DashboardError::InsufficientData(series.len()));
    }
    guard_prices(series)?;

    let daily = series
        .points()
        .iter()
        .tuple_windows()
        .map(|(prev, next)| GrowthPoint {
            timestamp: next.timestamp,
            pct_change: (next.close - prev.close) / prev.close * 100.0,
        })
        .collect();

    let first = series.points()[0].close;
    let last = series.points()[series.len() - 1].close;

    Ok(GrowthSummary {
        daily,
        overall_pct: (last - first) / first * 100.0,
    })
}

/// Pairwise Pearson correlation of close series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<Symbol>,
    /// Row-major square matrix in `symbols` order
    pub values: Vec<Vec<f64>>,
}

/// Correlate the close series of several symbols over a common window.
///
/// Series are truncated to the most recent closes they all share. A
/// zero-variance series yields NaN against every other, matching what the
/// dashboard has always displayed for flat assets.
pub fn correlation_matrix(series: &[(Symbol, PriceSeries)]) -> DashboardResult<CorrelationMatrix> {
    if series.len() < 2 {
        return Err(DashboardError::InvalidParameters(
            "correlation needs at least two symbols".to_string(),
        ));
    }

    let common_len = series
        .iter()
        .map(|(_, s)| s.len())
        .min()
        .unwrap_or(0);
    if common_len < 2 {
        return Err(DashboardError::InsufficientData(common_len));
    }

    let closes: Vec<Vec<f64>> = series
        .iter()
        .map(|(_, s)| s.closes().skip(s.len() - common_len).collect())
        .collect();

    let n = series.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&closes[i], &closes[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        symbols: series.iter().map(|(sym, _)| sym.clone()).collect(),
        values,
    })
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let stddev_a = a.iter().population_std_dev();
    let stddev_b = b.iter().population_std_dev();
    if stddev_a == 0.0 || stddev_b == 0.0 {
        return f64::NAN;
    }
    a.iter().population_covariance(b.iter()) / (stddev_a * stddev_b)
}

fn guard_prices(series: &PriceSeries) -> DashboardResult<()> {
    for (index, close) in series.closes().enumerate() {
        if !(close.is_finite() && close > 0.0) {
            return Err(DashboardError::InvalidPrice { index, value: close });
        }
    }
    Ok(())
}
