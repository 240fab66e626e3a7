//! In-memory cache store for upstream responses
//!
//! Provides a `CacheStore` that keeps serializable payloads keyed by request
//! fingerprint together with the time they were stored. Entries past their TTL
//! are hidden from fresh reads but stay readable through `get_stale`,
//! supporting graceful degradation when the upstream API is unavailable.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How long an entry is served as fresh, in seconds
pub const DEFAULT_TTL_SECS: i64 = 300;

/// A stored payload and the moment it was written
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached payload
    payload: Value,
    /// When the payload was stored
    stored_at: DateTime<Utc>,
}

/// Process-lifetime cache shared by the market and history fetchers
///
/// The store never evicts: an expired entry is only skipped by `get`, and is
/// kept so a failed upstream call can still fall back to it. Callers receive
/// owned copies of payloads, never references into the map.
#[derive(Debug)]
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    /// Creates an empty store with the default 300 second TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Creates an empty store with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The freshness window for entries in this store
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // Entries are replaced wholesale, so a panic while holding the lock
    // cannot leave a half-written entry behind.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the payload for `key` if it was stored less than one TTL ago
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Same as [`CacheStore::get`], evaluated at the given instant
    ///
    /// # Returns
    /// * `Some(T)` if the entry exists, `now - stored_at < ttl`, and the
    ///   payload deserializes into `T`
    /// * `None` otherwise; a stale entry is left in place
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let payload = {
            let entries = self.lock();
            let entry = entries.get(key)?;
            if now - entry.stored_at >= self.ttl {
                return None;
            }
            entry.payload.clone()
        };
        serde_json::from_value(payload).ok()
    }

    /// Returns the payload for `key` regardless of its age
    ///
    /// Only meant for failure fallbacks, when serving old data beats serving
    /// nothing.
    pub fn get_stale<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.lock().get(key)?.payload.clone();
        serde_json::from_value(payload).ok()
    }

    /// Stores `data` under `key`, replacing any previous entry
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if `data` cannot be represented as JSON
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<(), serde_json::Error> {
        self.put_at(key, data, Utc::now())
    }

    /// Same as [`CacheStore::put`], recording `stored_at` as the write time
    pub fn put_at<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        stored_at: DateTime<Utc>,
    ) -> Result<(), serde_json::Error> {
        let payload = serde_json::to_value(data)?;
        self.lock()
            .insert(key.to_string(), CacheEntry { payload, stored_at });
        Ok(())
    }

    /// Number of entries, fresh or stale
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
