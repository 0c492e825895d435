mod api;
mod config;
mod forecast;
mod models;
mod pipeline;
mod utils;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::api::{ForecastApiClient, ForecastSource};
use crate::config::AppConfig;
use crate::models::StockInfo;
use crate::pipeline::PredictionPipeline;
use crate::view::{Phase, ViewState};

#[derive(Parser)]
#[command(name = "stockcast", about = "Multi-model stock price forecast client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Request a forecast and display the aligned model outputs
    Predict {
        /// Ticker symbol, e.g. AAPL
        symbol: String,

        /// Number of days to forecast
        #[arg(short, long, default_value = "7")]
        days: String,
    },

    /// Show company metadata for a symbol
    Info {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "stockcast=info,warn",
        1 => "stockcast=debug,info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Predict { symbol, days } => {
            let client = ForecastApiClient::new(&config.api)?;
            let mut pipe = PredictionPipeline::new(client);

            if let Err(refusal) = pipe.trigger(&symbol, &days).await {
                eprintln!("{}", refusal);
                std::process::exit(2);
            }

            render_outcome(&symbol, pipe.state(), pipe.source());
            if pipe.state().phase() == Phase::Error {
                std::process::exit(1);
            }
        }

        Command::Info { symbol } => {
            let client = ForecastApiClient::new(&config.api)?;
            match client.stock_info(&symbol).await {
                Ok(info) => render_info(&info),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────────────────

fn render_outcome(symbol: &str, state: &ViewState, client: &ForecastApiClient) {
    if state.phase() == Phase::Error {
        eprintln!("{}", state.error_message());
        return;
    }

    if let Some(info) = state.stock_info() {
        render_info(info);
    }

    let display_name = state
        .stock_info()
        .map(|i| i.name.as_str())
        .unwrap_or(symbol);
    println!("Current price of {} : {}", display_name, state.current_price());

    if !state.rows().is_empty() {
        println!();
        println!("  {:<12} {:>12} {:>12} {:>12}", "Date", "LSTM", "XGBoost", "Final");
        for row in state.rows() {
            println!(
                "  {:<12} {:>12} {:>12} {:>12}",
                row.date,
                utils::fmt_price(row.lstm),
                utils::fmt_opt_price(row.xgboost),
                utils::fmt_opt_price(row.hybrid),
            );
        }
    }

    let graphs = state.graphs();
    for (model, bundle) in [
        ("LSTM", &graphs.lstm),
        ("XGBoost", &graphs.xgboost),
        ("Hybrid", &graphs.hybrid),
    ] {
        if bundle.is_empty() {
            continue;
        }
        println!();
        println!("  {} graphs:", model);
        for (kind, url) in bundle {
            println!("    {:<28} {}", kind, client.graph_url(url));
        }
    }
}

fn render_info(info: &StockInfo) {
    println!("─────────────────────────────────");
    println!("  {} — {}", info.symbol, info.name);
    println!("─────────────────────────────────");
    println!("  Exchange   : {}", info.exchange);
    println!("  Sector     : {}", info.sector);
    println!("  Industry   : {}", info.industry);
    println!("  Market cap : {}", info.market_cap);
    println!("  P/E ratio  : {}", info.pe_ratio);
    println!("  High / Low : {} / {}", info.all_time_high, info.all_time_low);
    if !info.about.is_empty() {
        println!();
        println!("  {}", utils::ellipsize(&info.about, 300));
    }
    println!("─────────────────────────────────");
}
