//! Growth command - day-over-day percentage changes for one symbol

use anyhow::Result;
use chrono::DateTime;

use crypto_dashboard::analysis;
use crypto_dashboard::cryptocompare::CryptoCompareClient;
use crypto_dashboard::history::HistoryFetcher;
use crypto_dashboard::Config;

pub fn run(config: Config, symbol: String, currency: String, days: u32) -> Result<()> {
    let client = CryptoCompareClient::with_config(&config.api);
    let rt = tokio::runtime::Runtime::new()?;
    let series = rt.block_on(client.fetch_history(&symbol, &currency, days))?;

    let summary = analysis::daily_growth(&series)?;

    println!("\n{}", "=".repeat(40));
    println!("DAILY GROWTH: {} ({})", symbol.to_uppercase(), currency.to_uppercase());
    println!("{}", "=".repeat(40));

    for point in &summary.daily {
        let date = DateTime::from_timestamp(point.timestamp, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| point.timestamp.to_string());
        println!("{date}  {:+8.2}%", point.pct_change);
    }

    println!("{}", "-".repeat(40));
    println!("Overall: {:+.2}% over {} days", summary.overall_pct, days);
    println!("{}\n", "=".repeat(40));

    Ok(())
}
