//! Short-lived aggregate cache.
//!
//! Entries are keyed by `rating:<content_id>` and carry their own TTL, so
//! a negative result ("no reviews") can expire sooner than a positive one.

use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::models::AggregateRecord;

/// Default lifetime of a cached aggregate.
pub const DEFAULT_POSITIVE_TTL: Duration = Duration::from_secs(300);

/// Default lifetime of a cached "no reviews" result.
pub const DEFAULT_NEGATIVE_TTL: Duration = Duration::from_secs(60);

/// A cached fetch result, which may itself record that there is no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachedAggregate {
    Found(AggregateRecord),
    Absent,
}

impl CachedAggregate {
    pub fn into_option(self) -> Option<AggregateRecord> {
        match self {
            CachedAggregate::Found(record) => Some(record),
            CachedAggregate::Absent => None,
        }
    }
}

/// TTL policy for cache writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub positive: Duration,
    pub negative: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_TTL,
            negative: DEFAULT_NEGATIVE_TTL,
        }
    }
}

/// Key/value cache contract used by the fetcher.
#[async_trait::async_trait]
pub trait RatingCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedAggregate>;

    async fn set(&self, key: &str, value: CachedAggregate, ttl: Duration);

    /// Removes one entry. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str);

    /// Removes every entry.
    async fn clear(&self);
}

#[derive(Debug, Clone)]
struct TimedEntry {
    value: CachedAggregate,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, TimedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &TimedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &TimedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache backed by moka.
pub struct MokaRatingCache {
    cache: Cache<String, TimedEntry>,
}

impl MokaRatingCache {
    /// Create a new cache holding at most `max_entries` aggregates.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

impl Default for MokaRatingCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait::async_trait]
impl RatingCache for MokaRatingCache {
    async fn get(&self, key: &str) -> Option<CachedAggregate> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: CachedAggregate, ttl: Duration) {
        self.cache
            .insert(key.to_string(), TimedEntry { value, ttl })
            .await;
    }

    async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
    }
}
