//! Short-lived cache linking `/api/related` to `/api/answer`
//!
//! A retrieval call stores its query and best extract under a random key.
//! The answer call pops that entry. A background janitor sweeps entries older
//! than the TTL, so abandoned lookups do not accumulate.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::types::{Extract, Lang};

/// A query waiting for its answer
#[derive(Debug, Clone)]
pub struct CachedQuery {
    /// Query text
    pub query: String,
    /// Most similar extract
    pub extract: Extract,
    /// Language of the retrieval request
    pub lang: Lang,
    /// When the entry was stored
    pub created_at: DateTime<Utc>,
}

/// Concurrent key-value store of pending queries
pub struct QueryCache {
    entries: DashMap<String, CachedQuery>,
    ttl: ChronoDuration,
}

impl QueryCache {
    /// Create a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::days(36_500)),
        }
    }

    /// Store a query and return its key
    pub fn insert(&self, query: &str, extract: Extract, lang: Lang) -> String {
        self.insert_at(query, extract, lang, Utc::now())
    }

    /// Store a query as if inserted at `now`
    pub fn insert_at(
        &self,
        query: &str,
        extract: Extract,
        lang: Lang,
        now: DateTime<Utc>,
    ) -> String {
        let key = cache_key(query, now);
        self.entries.insert(
            key.clone(),
            CachedQuery {
                query: query.to_string(),
                extract,
                lang,
                created_at: now,
            },
        );
        key
    }

    /// Remove and return an entry. A key can be taken once.
    pub fn take(&self, key: &str) -> Option<CachedQuery> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Delete every entry at least `ttl` old at `now`. Returns how many went.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.signed_duration_since(entry.created_at) < self.ttl);
        let deleted = before.saturating_sub(self.entries.len());

        tracing::info!("Cleaning cache. {} keys deleted.", deleted);
        deleted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hex SHA-256 of the query, the insertion time and a random nonce
fn cache_key(query: &str, now: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}

/// Sweep `cache` every `interval` until the runtime shuts down
pub fn spawn_janitor(cache: Arc<QueryCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            cache.sweep(Utc::now());
        }
    })
}
