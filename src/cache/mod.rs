//! Cache module for upstream API responses
//!
//! This module provides the request fingerprint used as a cache key and an
//! in-memory store with a fixed freshness window. Expired entries are kept and
//! can still be read through `get_stale`, allowing the fetchers to fall back
//! to old data when the upstream API is rate limited or unreachable.

mod key;
mod store;

pub use key::build_key;
pub use store::{CacheStore, DEFAULT_TTL_SECS};
