//! Cryptocurrency Dashboard Core
//!
//! Data backend for a crypto dashboard: spot market snapshots, close-series
//! analytics, and Monte Carlo fan-chart projections of future prices.
//!
//! The centerpiece is the fan-chart pipeline: fetch daily closes, estimate
//! a random-walk return model (mean and population stddev of simple daily
//! returns), simulate N compounded price paths over H future periods in
//! parallel, and reduce the path matrix to per-period percentile bands for
//! the rendering layer.
//!
//! ## Fan chart example
//! ```no_run
//! use crypto_dashboard::common::CancelToken;
//! use crypto_dashboard::config::FanChartConfig;
//! use crypto_dashboard::cryptocompare::CryptoCompareClient;
//! use crypto_dashboard::fan_chart::FanChartGenerator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let generator = FanChartGenerator::new(FanChartConfig::default())?;
//!     let client = CryptoCompareClient::new();
//!     let chart = generator.generate(&client, "BTC", &CancelToken::new()).await?;
//!     println!("{}", serde_json::to_string_pretty(&chart)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Market snapshot example
//! ```no_run
//! use crypto_dashboard::cryptocompare::CryptoCompareClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CryptoCompareClient::new();
//!     let quotes = client
//!         .price_snapshot(&["BTC".to_string(), "ETH".to_string()], "USD")
//!         .await?;
//!     for quote in quotes {
//!         println!("{}: {}", quote.symbol, quote.price);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod common;
pub mod config;
pub mod cryptocompare;
pub mod error;
pub mod fan_chart;
pub mod history;
pub mod percentile;
pub mod returns;
pub mod simulate;
pub mod types;

pub use config::{Config, FanChartConfig};
pub use error::{DashboardError, DashboardResult};
pub use fan_chart::FanChartGenerator;
pub use history::HistoryFetcher;
pub use types::*;

// Re-export the provider client for convenience
pub use cryptocompare::CryptoCompareClient;
