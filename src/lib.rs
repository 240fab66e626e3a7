//! coinfront library
//!
//! A data-access layer in front of the CoinGecko market API: request
//! fingerprints, an in-memory cache with a five minute freshness window, and
//! fetchers that degrade to stale or mock data when the upstream is rate
//! limited or unreachable.

pub mod cache;
pub mod cli;
pub mod data;
