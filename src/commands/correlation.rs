//! Correlation command - pairwise close-price correlation across symbols

use anyhow::{bail, Result};

use crypto_dashboard::analysis;
use crypto_dashboard::cryptocompare::CryptoCompareClient;
use crypto_dashboard::history::HistoryFetcher;
use crypto_dashboard::types::{PriceSeries, Symbol};
use crypto_dashboard::Config;

pub fn run(config: Config, symbols: String, currency: String, days: u32) -> Result<()> {
    let symbols: Vec<String> = symbols.split(',').map(|s| s.trim().to_string()).collect();
    if symbols.len() < 2 {
        bail!("correlation needs at least two symbols, got {}", symbols.len());
    }

    let client = CryptoCompareClient::with_config(&config.api);
    let rt = tokio::runtime::Runtime::new()?;

    // Sequential fetches; the client's rate limiter paces them anyway
    let mut pairs: Vec<(Symbol, PriceSeries)> = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let series = rt.block_on(client.fetch_history(symbol, &currency, days))?;
        pairs.push((Symbol::new(symbol.clone()), series));
    }

    let matrix = analysis::correlation_matrix(&pairs)?;

    print!("\n{:<8}", "");
    for symbol in &matrix.symbols {
        print!("{:>10}", symbol.as_str());
    }
    println!();

    for (i, symbol) in matrix.symbols.iter().enumerate() {
        print!("{:<8}", symbol.as_str());
        for value in &matrix.values[i] {
            print!("{value:>10.4}");
        }
        println!();
    }
    println!();

    Ok(())
}
