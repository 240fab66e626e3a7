//! Market snapshot fetcher for the CoinGecko `/coins/markets` endpoint
//!
//! Serves a page of listings ordered by market capitalization. Fresh cache
//! hits skip the network entirely; when the upstream is rate limited or
//! unreachable the fetcher serves the last cached page, however old, and
//! finally a fixed mock list.

use serde_json::Value;
use std::sync::Arc;

use super::mock::mock_snapshot;
use super::upstream::{Upstream, UpstreamRequest};
use super::{Attempt, Degradation, FetchError, MarketListing};
use crate::cache::{build_key, CacheStore};

/// Path of the listings endpoint, also used as the cache key prefix
const MARKETS_ENDPOINT: &str = "/coins/markets";

/// Client for paged market snapshots
#[derive(Clone)]
pub struct MarketsClient {
    upstream: Arc<dyn Upstream>,
    cache: Arc<CacheStore>,
}

impl MarketsClient {
    /// Creates a client that shares `cache` with other fetchers
    pub fn new(upstream: Arc<dyn Upstream>, cache: Arc<CacheStore>) -> Self {
        Self { upstream, cache }
    }

    /// Query parameters for one page; ordering and sparkline are fixed
    fn query(currency: &str, page: u32, per_page: u32) -> Vec<(String, String)> {
        vec![
            ("vs_currency".to_string(), currency.to_string()),
            ("order".to_string(), "market_cap_desc".to_string()),
            ("per_page".to_string(), per_page.to_string()),
            ("page".to_string(), page.to_string()),
            ("sparkline".to_string(), "false".to_string()),
        ]
    }

    /// Cache key for one page of listings
    pub fn cache_key(currency: &str, page: u32, per_page: u32) -> String {
        build_key(MARKETS_ENDPOINT, Self::query(currency, page, per_page))
    }

    /// Fetches one page of market listings
    ///
    /// # Arguments
    /// * `currency` - Quote currency, e.g. "usd"
    /// * `page` - 1-based page number
    /// * `per_page` - Listings per page
    ///
    /// # Returns
    /// * `Ok(Vec<MarketListing>)` - Fresh, cached, stale or mock listings
    /// * `Err(FetchError::Upstream)` - If the API answered with a status other
    ///   than 200 or 429
    ///
    /// # Behavior
    /// - Returns a fresh cache entry without calling the API
    /// - On 200, caches the raw response and returns it
    /// - On 429, timeout, transport failure or an unreadable body, returns the
    ///   cached page regardless of age, or the mock list when nothing is cached
    pub async fn fetch_market_snapshot(
        &self,
        currency: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<MarketListing>, FetchError> {
        let query = Self::query(currency, page, per_page);
        let cache_key = build_key(MARKETS_ENDPOINT, query.iter().map(|(k, v)| (k, v)));

        if let Some(listings) = self.cache.get::<Vec<MarketListing>>(&cache_key) {
            tracing::debug!(%cache_key, "market snapshot served from cache");
            return Ok(listings);
        }

        let request = UpstreamRequest::get(MARKETS_ENDPOINT).with_query(query);

        match self.attempt(request).await? {
            Attempt::Fetched((raw, listings)) => {
                if let Err(e) = self.cache.put(&cache_key, &raw) {
                    tracing::warn!(%cache_key, error = %e, "failed to cache market snapshot");
                }
                Ok(listings)
            }
            Attempt::Degraded(reason) => {
                reason.report(MARKETS_ENDPOINT);
                match self.cache.get_stale::<Vec<MarketListing>>(&cache_key) {
                    Some(listings) => {
                        tracing::info!(%cache_key, "serving stale market snapshot");
                        Ok(listings)
                    }
                    None => {
                        tracing::info!(%cache_key, "no cached market snapshot, serving mock data");
                        Ok(mock_snapshot())
                    }
                }
            }
        }
    }

    /// Makes the single upstream call and classifies its outcome
    async fn attempt(
        &self,
        request: UpstreamRequest,
    ) -> Result<Attempt<(Value, Vec<MarketListing>)>, FetchError> {
        let response = match self.upstream.get(request).await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Degraded(Degradation::Unreachable(e))),
        };

        match response.status {
            200 => Ok(match parse_listings(&response.body) {
                Ok(parsed) => Attempt::Fetched(parsed),
                Err(e) => Attempt::Degraded(Degradation::Malformed(e)),
            }),
            429 => Ok(Attempt::Degraded(Degradation::RateLimited)),
            status => {
                tracing::warn!(status, endpoint = MARKETS_ENDPOINT, "upstream returned an error status");
                Err(FetchError::upstream_status(status))
            }
        }
    }
}

/// Parses a listings body, keeping the raw array for the cache
fn parse_listings(body: &str) -> Result<(Value, Vec<MarketListing>), serde_json::Error> {
    let raw: Value = serde_json::from_str(body)?;
    let listings: Vec<MarketListing> = serde_json::from_value(raw.clone())?;
    Ok((raw, listings))
}
