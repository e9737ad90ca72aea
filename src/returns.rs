//! Return model estimation
//!
//! Derives the random-walk parameters for the fan-chart simulation from a
//! historical close series: per-day simple returns, their mean, and their
//! population standard deviation.
//!
//! The stddev is the population estimator (denominator = number of
//! returns, no Bessel correction); projections must stay reproducible
//! against these exact moments.

use itertools::Itertools;
use statrs::statistics::Statistics;

use crate::error::{DashboardError, DashboardResult};
use crate::types::{PriceSeries, ReturnModel};

/// Estimate the daily-return model for a close series.
///
/// Errors with [`DashboardError::InsufficientData`] for fewer than two
/// closes, and with [`DashboardError::InvalidPrice`] if any close is
/// non-positive or non-finite (a zero close would divide by zero and leak
/// inf/NaN into every downstream stage).
pub fn estimate(series: &PriceSeries) -> DashboardResult<ReturnModel> {
    if series.len() < 2 {
        return Err(DashboardError::InsufficientData(series.len()));
    }

    for (index, close) in series.closes().enumerate() {
        if !(close.is_finite() && close > 0.0) {
            return Err(DashboardError::InvalidPrice { index, value: close });
        }
    }

    let returns: Vec<f64> = series
        .closes()
        .tuple_windows()
        .map(|(prev, next)| (next - prev) / prev)
        .collect();

    let mean = returns.iter().mean();
    let stddev = returns.iter().population_std_dev();

    Ok(ReturnModel {
        mean,
        stddev,
        basis_count: returns.len(),
    })
}
