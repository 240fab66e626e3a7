//! HTTP transport to the CoinGecko API
//!
//! The fetchers talk to the network through the [`Upstream`] trait so the
//! degradation policy can be exercised without a live API. [`HttpUpstream`]
//! is the reqwest-backed implementation used in production.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Base URL for the CoinGecko public API
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Upper bound on a single upstream call
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised before an HTTP status is available
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// Connection, TLS, or body read failure
    #[error("Upstream request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(err)
        }
    }
}

/// A GET request against the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Path relative to the base URL, e.g. `/coins/markets`
    pub path: String,
    /// Query parameters, sent in the given order
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Creates a request for `path` with no query or headers
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Sets the query parameters
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Adds a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Looks up a header value by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text, unparsed
    pub body: String,
}

impl UpstreamResponse {
    /// Creates a response from a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Something that can execute a GET against the market-data API
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Performs a single attempt; no retries
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, TransportError>;
}

/// Upstream backed by a reqwest client with a fixed timeout
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Creates a client for the public CoinGecko API
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url(COINGECKO_BASE_URL)
    }

    /// Creates a client for a custom base URL (proxies, the pro API, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(UPSTREAM_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates an upstream around an existing HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(%url, "calling upstream");

        let mut builder = self.client.get(&url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}
