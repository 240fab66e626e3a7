//! Command-line interface parsing for coinfront
//!
//! This module handles parsing of CLI arguments using clap. Upstream settings
//! (API key, base URL) can also come from the environment, so a `.env` file
//! loaded at startup is enough to configure the tool.

use clap::{Parser, Subcommand};

use crate::data::COINGECKO_BASE_URL;

/// coinfront - Cached, rate-limit tolerant CoinGecko market data
#[derive(Parser, Debug)]
#[command(name = "coinfront")]
#[command(about = "Cached, rate-limit tolerant CoinGecko market data")]
#[command(version)]
pub struct Cli {
    /// CoinGecko demo API key, sent with price history requests
    #[arg(long, env = "COINGECKO_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the CoinGecko API
    #[arg(long, env = "COINGECKO_BASE_URL", default_value = COINGECKO_BASE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// What to fetch
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List assets ordered by market capitalization
    Markets {
        /// Quote currency
        #[arg(long, default_value = "usd")]
        currency: String,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Assets per page
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: u32,
    },

    /// Price history of one asset between two unix timestamps
    ///
    /// Examples:
    ///   coinfront history bitcoin --from 1700000000 --to 1700600000
    ///   coinfront history ethereum --currency eur --from 1700000000 --to 1700600000
    History {
        /// CoinGecko asset id, e.g. "bitcoin"
        id: String,

        /// Quote currency
        #[arg(long, default_value = "usd")]
        currency: String,

        /// Range start, unix seconds
        #[arg(long, allow_negative_numbers = true)]
        from: i64,

        /// Range end, unix seconds
        #[arg(long, allow_negative_numbers = true)]
        to: i64,
    },

    /// Top gainer, top loser and market-cap leaders of the first page
    Summary {
        /// Quote currency
        #[arg(long, default_value = "usd")]
        currency: String,

        /// Number of assets the summary is computed over
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: u32,
    },
}

/// Upstream settings derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API key for the history endpoint
    pub api_key: String,
    /// Base URL for all upstream calls
    pub base_url: String,
}

impl Config {
    /// Creates a Config from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.clone(),
            base_url: cli.base_url.clone(),
        }
    }
}
