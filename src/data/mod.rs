//! Core data models for coinfront
//!
//! This module contains the types returned to callers (market listings,
//! history points, market summaries), the error surfaced when the upstream API
//! rejects a request, and the classification of failures that are absorbed by
//! falling back to cached or mock data.

pub mod history;
pub mod markets;
pub mod mock;
pub mod summary;
pub mod upstream;

pub use history::HistoryClient;
pub use markets::MarketsClient;
pub use mock::{mock_history, mock_history_at, mock_snapshot};
pub use summary::{summarize, MarketSummary};
pub use upstream::{
    HttpUpstream, TransportError, Upstream, UpstreamRequest, UpstreamResponse, COINGECKO_BASE_URL,
};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One asset's current market snapshot
///
/// Field names follow the CoinGecko `/coins/markets` response. Numeric fields
/// are optional because the API reports `null` for assets without enough
/// trading data; fields not listed here are ignored. Text fields that are
/// missing or `null` read as empty strings, so one sparse listing never
/// invalidates a whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    /// CoinGecko asset id, e.g. "bitcoin"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// Ticker symbol, lowercase
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    /// Display name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Logo URL
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    /// Price in the requested quote currency
    pub current_price: Option<f64>,
    /// Market capitalization in the requested quote currency
    pub market_cap: Option<f64>,
    /// Rank by market capitalization
    pub market_cap_rank: Option<u32>,
    /// Price change over the last 24 hours, in percent
    pub price_change_percentage_24h: Option<f64>,
}

/// Reads a string field, treating `null` as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Unix timestamp in whole seconds
    ///
    /// Upstream millisecond timestamps are divided by 1000 and truncated
    /// toward zero, so `1700000000999` ms becomes `1700000000`.
    pub date: i64,
    /// Price in the requested quote currency
    pub price: f64,
}

/// Failures that reach the caller
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream answered with a status other than 200 or 429
    #[error("{message}")]
    Upstream { status: u16, message: String },
}

impl FetchError {
    pub(crate) fn upstream_status(status: u16) -> Self {
        FetchError::Upstream {
            status,
            message: format!("Error accessing the CoinGecko API: {}", status),
        }
    }

    /// The upstream HTTP status carried by this error
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Upstream { status, .. } => *status,
        }
    }
}

/// Why a fetch is being answered from fallback data instead of upstream
#[derive(Debug)]
pub(crate) enum Degradation {
    /// Upstream returned 429
    RateLimited,
    /// Timeout or transport failure
    Unreachable(TransportError),
    /// Upstream returned 200 with a body we could not interpret
    Malformed(serde_json::Error),
}

impl Degradation {
    /// Logs the trigger at a severity matching how expected it is
    ///
    /// Rate limiting and network trouble are routine for a free-tier API; a
    /// malformed 200 body points at an API change and is reported as an error.
    pub(crate) fn report(&self, endpoint: &str) {
        match self {
            Degradation::RateLimited => {
                tracing::warn!(endpoint, "upstream rate limited, serving fallback data");
            }
            Degradation::Unreachable(TransportError::Timeout) => {
                tracing::warn!(endpoint, "upstream timed out, serving fallback data");
            }
            Degradation::Unreachable(err) => {
                tracing::warn!(endpoint, error = %err, "upstream unreachable, serving fallback data");
            }
            Degradation::Malformed(err) => {
                tracing::error!(endpoint, error = %err, "malformed upstream response, serving fallback data");
            }
        }
    }
}

/// Outcome of a single upstream attempt, before a fallback is chosen
pub(crate) enum Attempt<T> {
    Fetched(T),
    Degraded(Degradation),
}
