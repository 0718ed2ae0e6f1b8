//! In-memory cache keyed by string, with calendar-aware expiry.
//!
//! Every entry stored here expires at the same weekly instant (see
//! [`ttl::WeeklyTtlPolicy`]) rather than after a fixed sliding window.
//! Expiry is lazy: `get` on a stale entry is a miss, and the entry itself is
//! only removed by `purge_expired` (run from a background sweep) or `clear`.
//!
//! The store is shared across request handlers; all mutation goes through a
//! single `RwLock`, so a `set`/`clear` can never expose a torn entry and the
//! last writer for a key wins.

pub mod ttl;

pub use ttl::WeeklyTtlPolicy;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Thread-safe key→value store whose entries expire at weekly boundaries.
pub struct CacheStore<V> {
    inner: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    policy: WeeklyTtlPolicy,
    clock: Arc<dyn Clock>,
}

// Manual impl: the derive would demand `V: Clone` even though only Arcs are
// cloned here.
impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        CacheStore {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
            clock: Arc::clone(&self.clock),
        }
    }
}

/// Snapshot of cache state for the `/cache/info` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    pub total_entries: usize,
    /// The boundary at which entries written right now would expire.
    pub next_refresh: DateTime<Utc>,
    pub entries: Vec<CacheEntryInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryInfo {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ttl_remaining_secs: i64,
}

impl<V: Clone + Send + Sync> CacheStore<V> {
    pub fn new(policy: WeeklyTtlPolicy, clock: Arc<dyn Clock>) -> Self {
        CacheStore {
            inner: Arc::new(RwLock::new(HashMap::new())),
            policy,
            clock,
        }
    }

    /// Look up a key. Expired entries behave as misses but are left in place
    /// for `purge_expired` to collect.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let inner = self.inner.read().await;
        inner
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    /// Store a value, replacing any previous entry for the key. The expiry is
    /// the next weekly boundary after "now".
    pub async fn set(&self, key: impl Into<String>, value: V) {
        let created_at = self.clock.now();
        let expires_at = self.policy.next_boundary(created_at);
        let entry = CacheEntry {
            value,
            created_at,
            expires_at,
        };
        let mut inner = self.inner.write().await;
        inner.insert(key.into(), entry);
    }

    /// Drop all entries, live or expired.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        let dropped = inner.len();
        inner.clear();
        debug!("Cache cleared ({} entries dropped)", dropped);
    }

    /// Remove entries whose expiry has passed. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;
        let before = inner.len();
        inner.retain(|_, entry| entry.expires_at > now);
        before - inner.len()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let inner = self.inner.read().await;
        inner.values().filter(|e| e.expires_at > now).count()
    }

    /// Live entry count plus per-entry remaining TTL, sorted by key.
    pub async fn info(&self) -> CacheInfo {
        let now = self.clock.now();
        let inner = self.inner.read().await;
        let mut entries: Vec<CacheEntryInfo> = inner
            .iter()
            .filter(|(_, e)| e.expires_at > now)
            .map(|(key, e)| CacheEntryInfo {
                key: key.clone(),
                created_at: e.created_at,
                expires_at: e.expires_at,
                ttl_remaining_secs: (e.expires_at - now).num_seconds(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        CacheInfo {
            total_entries: entries.len(),
            next_refresh: self.policy.next_boundary(now),
            entries,
        }
    }
}
