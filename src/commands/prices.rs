//! Prices command - spot market snapshot for the watchlist

use anyhow::Result;

use crypto_dashboard::cryptocompare::CryptoCompareClient;
use crypto_dashboard::Config;

pub fn run(config: Config, symbols: Option<String>, currency: String) -> Result<()> {
    let symbols: Vec<String> = match symbols {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.watchlist.clone(),
    };

    let client = CryptoCompareClient::with_config(&config.api);
    let rt = tokio::runtime::Runtime::new()?;
    let quotes = rt.block_on(client.price_snapshot(&symbols, &currency))?;

    println!("\n{}", "=".repeat(72));
    println!("MARKET SNAPSHOT ({})", currency.to_uppercase());
    println!("{}", "=".repeat(72));
    println!(
        "{:<8} {:>14} {:>12} {:>14} {:>14}",
        "SYMBOL", "PRICE", "24H CHANGE", "MARKET CAP", "24H VOLUME"
    );

    for quote in &quotes {
        println!(
            "{:<8} {:>14.2} {:>12} {:>14} {:>14}",
            quote.symbol.as_str(),
            quote.price,
            quote
                .change_24h
                .map(|c| format!("{c:+.2}"))
                .unwrap_or_else(|| "-".to_string()),
            quote
                .market_cap
                .map(format_large_number)
                .unwrap_or_else(|| "-".to_string()),
            quote
                .volume_24h
                .map(format_large_number)
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!("{}\n", "=".repeat(72));

    Ok(())
}

/// Human-readable magnitude suffix for large figures
fn format_large_number(number: f64) -> String {
    if number >= 1e12 {
        format!("{:.2}T", number / 1e12)
    } else if number >= 1e9 {
        format!("{:.2}B", number / 1e9)
    } else if number >= 1e6 {
        format!("{:.2}M", number / 1e6)
    } else {
        format!("{number:.2}")
    }
}
