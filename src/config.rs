//! Configuration management
//!
//! JSON configuration with per-field defaults matching observed dashboard
//! usage, plus environment variable support for the CryptoCompare API key.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DashboardError, DashboardResult};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fan_chart: FanChartConfig,
    /// Symbols shown by the market snapshot command
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
}

fn default_watchlist() -> Vec<String> {
    ["BTC", "ETH", "SOL", "BNB", "XRP"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// `CRYPTOCOMPARE_API_KEY` in the environment overrides the file value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults, with the API key taken from the environment if present
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(api_key) = std::env::var("CRYPTOCOMPARE_API_KEY") {
            if !api_key.is_empty() {
                self.api.api_key = Some(api_key);
            }
        }
    }
}

/// Provider client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_requests_per_second() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Fan-chart pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanChartConfig {
    /// Lookback window, in days
    #[serde(default = "default_historical_days")]
    pub historical_days: u32,
    /// Projection horizon, in periods
    #[serde(default = "default_prediction_days")]
    pub prediction_days: u32,
    /// Number of Monte Carlo paths
    #[serde(default = "default_simulations")]
    pub simulations: usize,
    /// Quote currency for fetched prices
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Quantile levels for the projection bands, each in (0, 1)
    #[serde(default = "default_percentile_levels")]
    pub percentile_levels: Vec<f64>,
    /// Spacing of projected timestamps, in seconds
    #[serde(default = "default_period_length_seconds")]
    pub period_length_seconds: i64,
    /// Master RNG seed; entropy-seeded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_historical_days() -> u32 {
    30
}

fn default_prediction_days() -> u32 {
    30
}

fn default_simulations() -> usize {
    1000
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_percentile_levels() -> Vec<f64> {
    vec![0.10, 0.50, 0.90]
}

fn default_period_length_seconds() -> i64 {
    86_400
}

impl Default for FanChartConfig {
    fn default() -> Self {
        FanChartConfig {
            historical_days: default_historical_days(),
            prediction_days: default_prediction_days(),
            simulations: default_simulations(),
            currency: default_currency(),
            percentile_levels: default_percentile_levels(),
            period_length_seconds: default_period_length_seconds(),
            seed: None,
        }
    }
}

impl FanChartConfig {
    pub fn with_historical_days(mut self, days: u32) -> Self {
        self.historical_days = days;
        self
    }

    pub fn with_prediction_days(mut self, days: u32) -> Self {
        self.prediction_days = days;
        self
    }

    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_percentile_levels(mut self, levels: Vec<f64>) -> Self {
        self.percentile_levels = levels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> DashboardResult<()> {
        if self.historical_days < 2 {
            return Err(DashboardError::InvalidParameters(format!(
                "historical_days ({}) must be at least 2",
                self.historical_days
            )));
        }
        if self.prediction_days < 1 {
            return Err(DashboardError::InvalidParameters(
                "prediction_days must be at least 1".to_string(),
            ));
        }
        if self.simulations < 1 {
            return Err(DashboardError::InvalidParameters(
                "simulations must be at least 1".to_string(),
            ));
        }
        if self.period_length_seconds < 1 {
            return Err(DashboardError::InvalidParameters(format!(
                "period_length_seconds ({}) must be positive",
                self.period_length_seconds
            )));
        }
        if self.percentile_levels.is_empty() {
            return Err(DashboardError::InvalidParameters(
                "at least one percentile level is required".to_string(),
            ));
        }
        for &level in &self.percentile_levels {
            if !level.is_finite() || level <= 0.0 || level >= 1.0 {
                return Err(DashboardError::InvalidParameters(format!(
                    "percentile level {level} is outside (0, 1)"
                )));
            }
        }
        if self.currency.is_empty() {
            return Err(DashboardError::InvalidParameters(
                "currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_usage() {
        let config = FanChartConfig::default();
        assert_eq!(config.historical_days, 30);
        assert_eq!(config.prediction_days, 30);
        assert_eq!(config.simulations, 1000);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.percentile_levels, vec![0.10, 0.50, 0.90]);
        assert_eq!(config.period_length_seconds, 86_400);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"fan_chart": {"simulations": 250}}"#).unwrap();
        assert_eq!(config.fan_chart.simulations, 250);
        assert_eq!(config.fan_chart.historical_days, 30);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.watchlist.len(), 5);
    }

    #[test]
    fn test_validate_rejects_bad_levels() {
        let config = FanChartConfig::default().with_percentile_levels(vec![0.5, 1.2]);
        assert!(config.validate().is_err());

        let config = FanChartConfig::default().with_percentile_levels(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_lookback() {
        let config = FanChartConfig::default().with_historical_days(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_simulations() {
        let config = FanChartConfig::default().with_simulations(0);
        assert!(config.validate().is_err());
    }
}
