//! Fan-chart command - fetch history, simulate, and emit the projection

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crypto_dashboard::common::CancelToken;
use crypto_dashboard::cryptocompare::CryptoCompareClient;
use crypto_dashboard::fan_chart::FanChartGenerator;
use crypto_dashboard::Config;

/// CLI flag overrides applied on top of the loaded configuration
#[derive(Debug, Default)]
pub struct Overrides {
    pub currency: Option<String>,
    pub historical_days: Option<u32>,
    pub prediction_days: Option<u32>,
    pub simulations: Option<usize>,
    pub seed: Option<u64>,
}

pub fn run(
    mut config: Config,
    symbol: String,
    overrides: Overrides,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(currency) = overrides.currency {
        config.fan_chart.currency = currency;
    }
    if let Some(days) = overrides.historical_days {
        config.fan_chart.historical_days = days;
    }
    if let Some(days) = overrides.prediction_days {
        config.fan_chart.prediction_days = days;
    }
    if let Some(simulations) = overrides.simulations {
        config.fan_chart.simulations = simulations;
    }
    if let Some(seed) = overrides.seed {
        config.fan_chart.seed = Some(seed);
    }

    let generator = FanChartGenerator::new(config.fan_chart.clone())?;
    let client = CryptoCompareClient::with_config(&config.api);

    let rt = tokio::runtime::Runtime::new()?;

    // Ctrl-C aborts between simulation batches instead of killing mid-write
    let cancel = CancelToken::new();
    let signal_cancel = cancel.clone();
    rt.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "Projecting {} paths over {} days for {}",
        config.fan_chart.simulations, config.fan_chart.prediction_days, symbol
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let chart = rt.block_on(generator.generate(&client, &symbol, &cancel))?;
    spinner.finish_and_clear();

    let json = serde_json::to_string_pretty(&chart).context("Failed to serialize fan chart")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "fan chart written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
