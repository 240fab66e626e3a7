//! coinfront - Cached CoinGecko market data from the command line
//!
//! Fetches market snapshots, price histories and market summaries through the
//! caching, rate-limit tolerant fetchers and prints them as JSON.

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coinfront::cache::CacheStore;
use coinfront::cli::{Cli, Command, Config};
use coinfront::data::{summarize, HistoryClient, HttpUpstream, MarketsClient, Upstream};

/// Sets up logging to stderr so stdout carries only JSON output
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinfront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    if config.api_key.is_empty() {
        tracing::debug!("COINGECKO_API_KEY is not set; history requests may be rejected");
    }

    let upstream: Arc<dyn Upstream> = Arc::new(HttpUpstream::with_base_url(&config.base_url)?);
    let cache = Arc::new(CacheStore::new());
    let markets = MarketsClient::new(Arc::clone(&upstream), Arc::clone(&cache));
    let history = HistoryClient::new(upstream, cache, config.api_key);

    match cli.command {
        Command::Markets {
            currency,
            page,
            per_page,
        } => {
            let listings = markets
                .fetch_market_snapshot(&currency, page, per_page)
                .await?;
            print_json(&listings)?;
        }
        Command::History {
            id,
            currency,
            from,
            to,
        } => {
            let points = history.fetch_history(&id, &currency, from, to).await?;
            print_json(&points)?;
        }
        Command::Summary { currency, per_page } => {
            let listings = markets.fetch_market_snapshot(&currency, 1, per_page).await?;
            print_json(&summarize(&listings))?;
        }
    }

    Ok(())
}
