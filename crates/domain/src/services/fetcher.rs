//! Aggregate data fetcher.
//!
//! Reads the review count and mean for a content item through the cache.
//! Every failure mode degrades to "no data": callers only ever see an
//! aggregate or `None`.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::cache::{CacheTtl, CachedAggregate, RatingCache};
use super::store::ReviewStore;
use crate::models::{cache_key, AggregateRecord};

/// Cache-checked reader of aggregate ratings.
pub struct AggregateFetcher {
    store: Arc<dyn ReviewStore>,
    cache: Arc<dyn RatingCache>,
    ttl: CacheTtl,
    /// Result of the first successful availability probe.
    store_available: OnceCell<bool>,
}

impl AggregateFetcher {
    pub fn new(store: Arc<dyn ReviewStore>, cache: Arc<dyn RatingCache>, ttl: CacheTtl) -> Self {
        Self {
            store,
            cache,
            ttl,
            store_available: OnceCell::new(),
        }
    }

    pub fn ttl(&self) -> CacheTtl {
        self.ttl
    }

    /// Whether the review store's backing table exists.
    ///
    /// The first definitive answer is kept for the lifetime of the fetcher.
    /// Probe errors are not remembered, so a later call probes again.
    pub async fn store_available(&self) -> bool {
        match self
            .store_available
            .get_or_try_init(|| self.store.is_available())
            .await
        {
            Ok(available) => *available,
            Err(err) => {
                warn!(error = %err, "Review store availability probe failed");
                false
            }
        }
    }

    /// Returns the aggregate for a content item, or `None` if it has no
    /// approved rated reviews, the ID is invalid, or the store fails.
    pub async fn fetch(&self, content_id: i64) -> Option<AggregateRecord> {
        if content_id <= 0 {
            return None;
        }

        let key = cache_key(content_id);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(content_id, "Aggregate cache hit");
            return cached.into_option();
        }
        debug!(content_id, "Aggregate cache miss");

        if !self.store_available().await {
            return None;
        }

        let start = Instant::now();
        let totals = self.store.aggregate(content_id).await;
        debug!(
            content_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Aggregate query finished"
        );

        let record = match totals {
            Ok(totals) => AggregateRecord::from_totals(totals),
            Err(err) => {
                warn!(content_id, error = %err, "Aggregate query failed, treating as no data");
                None
            }
        };

        match record {
            Some(record) => {
                self.cache
                    .set(&key, CachedAggregate::Found(record.clone()), self.ttl.positive)
                    .await;
                Some(record)
            }
            None => {
                self.cache
                    .set(&key, CachedAggregate::Absent, self.ttl.negative)
                    .await;
                None
            }
        }
    }

    /// Cheap check for at least one approved, rated review, bypassing the
    /// aggregate cache.
    pub async fn probe_reviews(&self, content_id: i64) -> bool {
        if content_id <= 0 || !self.store_available().await {
            return false;
        }
        match self.store.has_rated_reviews(content_id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(content_id, error = %err, "Review probe failed");
                false
            }
        }
    }

    /// Drops the cached aggregate of one content item.
    pub async fn invalidate(&self, content_id: i64) {
        self.cache.delete(&cache_key(content_id)).await;
    }

    /// Drops every cached aggregate.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }
}
