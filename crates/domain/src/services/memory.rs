//! In-process collaborator implementations.
//!
//! Used by tests and by the API when no database is configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

use serde_json::Value;

use super::cache::{CachedAggregate, RatingCache};
use super::store::{ContentSource, ReviewObserver, ReviewStore, SettingsStore};
use crate::errors::StoreError;
use crate::models::{
    ContentItem, RatingTotals, ReviewAction, ReviewEvent, ReviewSample, ReviewStatistics,
    SchemaSettings,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
struct StoredReview {
    id: i64,
    content_id: i64,
    rating: f64,
    approved: bool,
}

impl StoredReview {
    fn counts(&self) -> bool {
        self.approved && self.rating > 0.0
    }
}

/// Review store kept in memory. Mutations notify registered observers.
///
/// Observers are held weakly; dropped ones are pruned on the next mutation.
pub struct InMemoryReviewStore {
    reviews: RwLock<Vec<StoredReview>>,
    observers: RwLock<Vec<Weak<dyn ReviewObserver>>>,
    next_id: AtomicI64,
    available: bool,
    failing: bool,
    aggregate_queries: AtomicUsize,
    availability_probes: AtomicUsize,
}

impl InMemoryReviewStore {
    fn with_flags(available: bool, failing: bool) -> Self {
        Self {
            reviews: RwLock::new(Vec::new()),
            observers: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            available,
            failing,
            aggregate_queries: AtomicUsize::new(0),
            availability_probes: AtomicUsize::new(0),
        }
    }

    pub fn new() -> Self {
        Self::with_flags(true, false)
    }

    /// A store whose backing table is missing.
    pub fn unavailable() -> Self {
        Self::with_flags(false, false)
    }

    /// A store whose queries always fail.
    pub fn failing() -> Self {
        Self::with_flags(true, true)
    }

    pub fn register_observer(&self, observer: Arc<dyn ReviewObserver>) {
        write(&self.observers).push(Arc::downgrade(&observer));
    }

    /// Number of registered observers still alive or not yet pruned.
    pub fn observer_count(&self) -> usize {
        read(&self.observers).len()
    }

    /// Number of aggregate queries served so far.
    pub fn aggregate_queries(&self) -> usize {
        self.aggregate_queries.load(Ordering::SeqCst)
    }

    pub fn availability_probes(&self) -> usize {
        self.availability_probes.load(Ordering::SeqCst)
    }

    async fn notify(&self, content_id: i64, action: ReviewAction) {
        let observers: Vec<_> = {
            let mut registered = write(&self.observers);
            registered.retain(|observer| observer.strong_count() > 0);
            registered.iter().filter_map(Weak::upgrade).collect()
        };
        let event = ReviewEvent::new(content_id, action);
        for observer in observers {
            observer.review_changed(event.clone()).await;
        }
    }

    /// Adds a review and returns its ID.
    pub async fn add_review(&self, content_id: i64, rating: f64, approved: bool) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        write(&self.reviews).push(StoredReview {
            id,
            content_id,
            rating,
            approved,
        });
        self.notify(content_id, ReviewAction::Created).await;
        id
    }

    /// Changes the rating of a review. Returns false if it does not exist.
    pub async fn update_rating(&self, review_id: i64, rating: f64) -> bool {
        let content_id = {
            let mut reviews = write(&self.reviews);
            match reviews.iter_mut().find(|r| r.id == review_id) {
                Some(review) => {
                    review.rating = rating;
                    review.content_id
                }
                None => return false,
            }
        };
        self.notify(content_id, ReviewAction::Updated).await;
        true
    }

    /// Removes a review. Returns false if it does not exist.
    pub async fn delete_review(&self, review_id: i64) -> bool {
        let content_id = {
            let mut reviews = write(&self.reviews);
            match reviews.iter().position(|r| r.id == review_id) {
                Some(index) => reviews.remove(index).content_id,
                None => return false,
            }
        };
        self.notify(content_id, ReviewAction::Deleted).await;
        true
    }

    fn check(&self) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable("reviews table missing".to_string()));
        }
        if self.failing {
            return Err(StoreError::Query("simulated failure".to_string()));
        }
        Ok(())
    }

    fn rated(&self, content_id: i64) -> Vec<f64> {
        read(&self.reviews)
            .iter()
            .filter(|r| r.content_id == content_id && r.counts())
            .map(|r| r.rating)
            .collect()
    }
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn is_available(&self) -> Result<bool, StoreError> {
        self.availability_probes.fetch_add(1, Ordering::SeqCst);
        Ok(self.available)
    }

    async fn count_approved_rated_reviews(&self, content_id: i64) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.rated(content_id).len() as i64)
    }

    async fn average_rating(&self, content_id: i64) -> Result<Option<f64>, StoreError> {
        self.check()?;
        let ratings = self.rated(content_id);
        if ratings.is_empty() {
            return Ok(None);
        }
        Ok(Some(ratings.iter().sum::<f64>() / ratings.len() as f64))
    }

    async fn aggregate(&self, content_id: i64) -> Result<RatingTotals, StoreError> {
        self.aggregate_queries.fetch_add(1, Ordering::SeqCst);
        let count = self.count_approved_rated_reviews(content_id).await?;
        let average = self.average_rating(content_id).await?;
        Ok(RatingTotals { count, average })
    }

    async fn statistics(&self) -> Result<ReviewStatistics, StoreError> {
        self.check()?;
        let reviews = read(&self.reviews);
        let sample = reviews
            .iter()
            .filter(|r| r.counts())
            .max_by_key(|r| r.id)
            .map(|r| ReviewSample {
                content_id: r.content_id,
                rating: r.rating,
            });
        Ok(ReviewStatistics {
            total_reviews: reviews.len() as i64,
            approved_reviews: reviews.iter().filter(|r| r.approved).count() as i64,
            sample,
        })
    }
}

/// Content metadata kept in memory.
#[derive(Default)]
pub struct InMemoryContentSource {
    items: RwLock<HashMap<i64, ContentItem>>,
    external: RwLock<HashMap<i64, Vec<Value>>>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, item: ContentItem) {
        write(&self.items).insert(item.id, item);
    }

    /// Stores a third-party schema list for a content item.
    pub fn set_external_schemas(&self, content_id: i64, schemas: Vec<Value>) {
        write(&self.external).insert(content_id, schemas);
    }
}

#[async_trait::async_trait]
impl ContentSource for InMemoryContentSource {
    async fn find_content(&self, content_id: i64) -> Result<Option<ContentItem>, StoreError> {
        Ok(read(&self.items).get(&content_id).cloned())
    }

    async fn external_schemas(&self, content_id: i64) -> Result<Option<Vec<Value>>, StoreError> {
        Ok(read(&self.external).get(&content_id).cloned())
    }
}

/// Settings kept in memory.
#[derive(Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<SchemaSettings>,
}

impl InMemorySettingsStore {
    pub fn new(settings: SchemaSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> Result<SchemaSettings, StoreError> {
        Ok(read(&self.settings).clone())
    }

    async fn save(&self, settings: SchemaSettings) -> Result<SchemaSettings, StoreError> {
        *write(&self.settings) = settings.clone();
        Ok(settings)
    }
}

/// Cache that never expires and remembers the TTL of each write.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, (CachedAggregate, Duration)>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, (CachedAggregate, Duration)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// TTL the key was last written with.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn peek(&self, key: &str) -> Option<CachedAggregate> {
        self.entries().get(key).map(|(value, _)| value.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[async_trait::async_trait]
impl RatingCache for RecordingCache {
    async fn get(&self, key: &str) -> Option<CachedAggregate> {
        self.peek(key)
    }

    async fn set(&self, key: &str, value: CachedAggregate, ttl: Duration) {
        self.entries().insert(key.to_string(), (value, ttl));
    }

    async fn delete(&self, key: &str) {
        self.entries().remove(key);
    }

    async fn clear(&self) {
        self.entries().clear();
    }
}
