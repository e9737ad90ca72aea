//! Fan-chart generation pipeline
//!
//! Ties the stages together: fetch history, estimate the return model,
//! simulate paths, summarize percentiles, assemble the result. Strictly
//! sequential; each stage is a pure function of the previous stage's
//! output, and a failure anywhere aborts the whole invocation.

use tracing::{debug, info};

use crate::common::CancelToken;
use crate::config::FanChartConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::history::HistoryFetcher;
use crate::percentile;
use crate::returns;
use crate::simulate::PathSimulator;
use crate::types::{FanChartResult, PriceSeries, Projection, Symbol};

/// Fan-chart pipeline, parameterized once and reusable across symbols.
///
/// # Example
///
/// ```no_run
/// use crypto_dashboard::common::CancelToken;
/// use crypto_dashboard::config::FanChartConfig;
/// use crypto_dashboard::cryptocompare::CryptoCompareClient;
/// use crypto_dashboard::fan_chart::FanChartGenerator;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let generator = FanChartGenerator::new(FanChartConfig::default().with_seed(42))?;
///     let client = CryptoCompareClient::new();
///     let chart = generator
///         .generate(&client, "BTC", &CancelToken::new())
///         .await?;
///     println!("{} bands projected", chart.projection.bands.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FanChartGenerator {
    config: FanChartConfig,
}

impl FanChartGenerator {
    /// Validate the configuration and build a generator
    pub fn new(config: FanChartConfig) -> DashboardResult<Self> {
        config.validate()?;
        Ok(FanChartGenerator { config })
    }

    pub fn config(&self) -> &FanChartConfig {
        &self.config
    }

    /// Run the full pipeline for one symbol
    pub async fn generate(
        &self,
        fetcher: &dyn HistoryFetcher,
        symbol: &str,
        cancel: &CancelToken,
    ) -> DashboardResult<FanChartResult> {
        info!(symbol, days = self.config.historical_days, "generating fan chart");
        let series = fetcher
            .fetch_history(symbol, &self.config.currency, self.config.historical_days)
            .await?;
        self.project(symbol, series, cancel)
    }

    /// Compute stage of the pipeline: everything after the fetch.
    ///
    /// Split out so callers with an already-fetched series (and tests) can
    /// run the numeric stages synchronously.
    pub fn project(
        &self,
        symbol: &str,
        series: PriceSeries,
        cancel: &CancelToken,
    ) -> DashboardResult<FanChartResult> {
        let model = returns::estimate(&series)?;
        debug!(
            mean = model.mean,
            stddev = model.stddev,
            basis = model.basis_count,
            "estimated return model"
        );

        let last = match series.last() {
            Some(point) => *point,
            None => return Err(DashboardError::InsufficientData(0)),
        };

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let horizon = self.config.prediction_days as usize;
        let matrix = PathSimulator::new(seed).simulate(
            last.close,
            &model,
            horizon,
            self.config.simulations,
            cancel,
        )?;

        let bands = percentile::summarize(&matrix, &self.config.percentile_levels)?;
        let timestamps = (1..=horizon as i64)
            .map(|k| last.timestamp + k * self.config.period_length_seconds)
            .collect();

        Ok(FanChartResult {
            symbol: Symbol::new(symbol),
            currency: self.config.currency.clone(),
            historical: series,
            projection: Projection { timestamps, bands },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricePoint;
    use approx::assert_relative_eq;

    fn series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(1_700_000_000 + i as i64 * 86_400, c))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    #[test]
    fn test_projected_timestamps_extend_history() {
        let generator = FanChartGenerator::new(
            FanChartConfig::default()
                .with_prediction_days(4)
                .with_simulations(10)
                .with_seed(1),
        )
        .unwrap();

        let chart = generator
            .project("btc", series(&[100.0, 101.0, 102.0]), &CancelToken::new())
            .unwrap();

        let last = 1_700_000_000 + 2 * 86_400;
        assert_eq!(
            chart.projection.timestamps,
            vec![last + 86_400, last + 2 * 86_400, last + 3 * 86_400, last + 4 * 86_400]
        );
        assert_eq!(chart.symbol.as_str(), "BTC");
        assert_eq!(chart.historical.len(), 3);
    }

    #[test]
    fn test_flat_history_collapses_bands_to_last_close() {
        let generator = FanChartGenerator::new(
            FanChartConfig::default()
                .with_prediction_days(3)
                .with_simulations(5)
                .with_seed(7),
        )
        .unwrap();

        let chart = generator
            .project("eth", series(&[200.0, 200.0, 200.0]), &CancelToken::new())
            .unwrap();

        for band in &chart.projection.bands {
            for &value in &band.values {
                assert_relative_eq!(value, 200.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_bad_config_rejected_at_construction() {
        assert!(FanChartGenerator::new(FanChartConfig::default().with_simulations(0)).is_err());
    }

    #[test]
    fn test_short_series_fails_whole_pipeline() {
        let generator = FanChartGenerator::new(FanChartConfig::default().with_seed(1)).unwrap();
        assert!(matches!(
            generator.project("btc", series(&[100.0]), &CancelToken::new()),
            Err(DashboardError::InsufficientData(1))
        ));
    }

    #[test]
    fn test_cancellation_propagates() {
        let generator = FanChartGenerator::new(FanChartConfig::default().with_seed(1)).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            generator.project("btc", series(&[100.0, 101.0]), &cancel),
            Err(DashboardError::Cancelled)
        ));
    }
}
