//! Crypto dashboard backend - main entry point
//!
//! This binary provides four subcommands:
//! - fan-chart: generate a Monte Carlo fan-chart projection for a symbol
//! - prices: spot market snapshot for the watchlist
//! - growth: day-over-day growth for one symbol
//! - correlation: close-price correlation across symbols

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crypto_dashboard::Config;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "crypto-dashboard")]
#[command(about = "Cryptocurrency dashboard backend: market data and fan-chart projections", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a fan-chart projection
    FanChart {
        /// Cryptocurrency symbol (e.g. "BTC")
        #[arg(short, long, default_value = "BTC")]
        symbol: String,

        /// Quote currency (overrides config)
        #[arg(long)]
        currency: Option<String>,

        /// Days of history to fetch (overrides config)
        #[arg(long)]
        historical_days: Option<u32>,

        /// Days to project forward (overrides config)
        #[arg(long)]
        prediction_days: Option<u32>,

        /// Number of Monte Carlo paths (overrides config)
        #[arg(long)]
        simulations: Option<usize>,

        /// Master RNG seed for reproducible projections
        #[arg(long)]
        seed: Option<u64>,

        /// Write the JSON result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a spot market snapshot
    Prices {
        /// Symbols (comma-separated), overriding the config watchlist
        #[arg(short, long)]
        symbols: Option<String>,

        /// Quote currency
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// Day-over-day growth for one symbol
    Growth {
        /// Cryptocurrency symbol (e.g. "BTC")
        #[arg(short, long, default_value = "BTC")]
        symbol: String,

        /// Quote currency
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Days of history to include
        #[arg(short, long, default_value = "30")]
        days: u32,
    },

    /// Close-price correlation across symbols
    Correlation {
        /// Symbols to correlate (comma-separated)
        #[arg(short, long, default_value = "BTC,ETH,BNB")]
        symbols: String,

        /// Quote currency
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Days of history per symbol
        #[arg(short, long, default_value = "30")]
        days: u32,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );

    // Filter out noisy HTTP stack crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::FanChart { .. } => "fan_chart",
        Commands::Prices { .. } => "prices",
        Commands::Growth { .. } => "growth",
        Commands::Correlation { .. } => "correlation",
    };
    setup_logging(cli.verbose, command_name)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };

    match cli.command {
        Commands::FanChart {
            symbol,
            currency,
            historical_days,
            prediction_days,
            simulations,
            seed,
            output,
        } => commands::fan_chart::run(
            config,
            symbol,
            commands::fan_chart::Overrides {
                currency,
                historical_days,
                prediction_days,
                simulations,
                seed,
            },
            output,
        ),
        Commands::Prices { symbols, currency } => commands::prices::run(config, symbols, currency),
        Commands::Growth {
            symbol,
            currency,
            days,
        } => commands::growth::run(config, symbol, currency, days),
        Commands::Correlation {
            symbols,
            currency,
            days,
        } => commands::correlation::run(config, symbols, currency, days),
    }
}
