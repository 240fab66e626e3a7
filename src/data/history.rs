//! Price history fetcher for the CoinGecko `market_chart/range` endpoint
//!
//! Fetches a time-bounded price series for one asset and flattens the
//! upstream `[timestamp_ms, price]` pairs into [`HistoryPoint`]s. Unlike the
//! market snapshot, failed calls never fall back to stale cache entries:
//! any absorbed failure is answered with mock history.

use serde::Deserialize;
use std::sync::Arc;

use super::mock::mock_history;
use super::upstream::{Upstream, UpstreamRequest};
use super::{Attempt, Degradation, FetchError, HistoryPoint};
use crate::cache::{build_key, CacheStore};

/// Header carrying the CoinGecko demo API key
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Response body of `/coins/{id}/market_chart/range`
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs; absent when the range holds no data
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

/// Client for historical price ranges
#[derive(Clone)]
pub struct HistoryClient {
    upstream: Arc<dyn Upstream>,
    cache: Arc<CacheStore>,
    api_key: String,
}

impl HistoryClient {
    /// Creates a client that shares `cache` with other fetchers
    ///
    /// `api_key` is sent verbatim on every request; an empty or invalid key
    /// surfaces as an upstream error status.
    pub fn new(upstream: Arc<dyn Upstream>, cache: Arc<CacheStore>, api_key: impl Into<String>) -> Self {
        Self {
            upstream,
            cache,
            api_key: api_key.into(),
        }
    }

    fn endpoint(asset_id: &str) -> String {
        format!("/coins/{}/market_chart/range", asset_id)
    }

    fn query(currency: &str, from: i64, to: i64) -> Vec<(String, String)> {
        vec![
            ("vs_currency".to_string(), currency.to_string()),
            ("from".to_string(), from.to_string()),
            ("to".to_string(), to.to_string()),
        ]
    }

    /// Cache key for one asset's price range
    pub fn cache_key(asset_id: &str, currency: &str, from: i64, to: i64) -> String {
        build_key(&Self::endpoint(asset_id), Self::query(currency, from, to))
    }

    /// Fetches the price history of `asset_id` between two unix timestamps
    ///
    /// The range is passed through as given; `from > to` is the upstream's
    /// business.
    ///
    /// # Returns
    /// * `Ok(Vec<HistoryPoint>)` - Fresh, cached or mock history, in upstream order
    /// * `Err(FetchError::Upstream)` - If the API answered with a status other
    ///   than 200 or 429
    pub async fn fetch_history(
        &self,
        asset_id: &str,
        currency: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<HistoryPoint>, FetchError> {
        let endpoint = Self::endpoint(asset_id);
        let query = Self::query(currency, from, to);
        let cache_key = build_key(&endpoint, query.iter().map(|(k, v)| (k, v)));

        if let Some(points) = self.cache.get::<Vec<HistoryPoint>>(&cache_key) {
            tracing::debug!(%cache_key, "price history served from cache");
            return Ok(points);
        }

        let request = UpstreamRequest::get(endpoint.as_str())
            .with_query(query)
            .with_header("accept", "application/json")
            .with_header(API_KEY_HEADER, self.api_key.as_str());

        match self.attempt(&endpoint, request).await? {
            Attempt::Fetched(points) => {
                if let Err(e) = self.cache.put(&cache_key, &points) {
                    tracing::warn!(%cache_key, error = %e, "failed to cache price history");
                }
                Ok(points)
            }
            Attempt::Degraded(reason) => {
                reason.report(&endpoint);
                Ok(mock_history(asset_id))
            }
        }
    }

    async fn attempt(
        &self,
        endpoint: &str,
        request: UpstreamRequest,
    ) -> Result<Attempt<Vec<HistoryPoint>>, FetchError> {
        let response = match self.upstream.get(request).await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Degraded(Degradation::Unreachable(e))),
        };

        match response.status {
            200 => Ok(match parse_history(&response.body) {
                Ok(points) => Attempt::Fetched(points),
                Err(e) => Attempt::Degraded(Degradation::Malformed(e)),
            }),
            429 => Ok(Attempt::Degraded(Degradation::RateLimited)),
            status => {
                tracing::warn!(status, endpoint, "upstream returned an error status");
                Err(FetchError::upstream_status(status))
            }
        }
    }
}

/// Converts a market chart body into second-resolution history points
fn parse_history(body: &str) -> Result<Vec<HistoryPoint>, serde_json::Error> {
    let chart: MarketChartResponse = serde_json::from_str(body)?;

    Ok(chart
        .prices
        .into_iter()
        .map(|(millis, price)| HistoryPoint {
            date: (millis / 1000.0) as i64,
            price,
        })
        .collect())
}
