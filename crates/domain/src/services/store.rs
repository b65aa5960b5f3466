//! Contracts of the external collaborators the pipeline reads from.

use crate::errors::StoreError;
use crate::models::{
    ContentItem, RatingTotals, ReviewEvent, ReviewStatistics, SchemaSettings,
};

/// Read access to the review store.
#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    /// Whether the backing review table exists and is reachable.
    async fn is_available(&self) -> Result<bool, StoreError>;

    /// Number of approved reviews rated above zero.
    async fn count_approved_rated_reviews(&self, content_id: i64) -> Result<i64, StoreError>;

    /// Mean rating of approved reviews rated above zero.
    async fn average_rating(&self, content_id: i64) -> Result<Option<f64>, StoreError>;

    /// Count and mean in one round trip.
    async fn aggregate(&self, content_id: i64) -> Result<RatingTotals, StoreError> {
        let count = self.count_approved_rated_reviews(content_id).await?;
        let average = if count > 0 {
            self.average_rating(content_id).await?
        } else {
            None
        };
        Ok(RatingTotals { count, average })
    }

    /// Cheap existence probe for at least one approved, rated review.
    async fn has_rated_reviews(&self, content_id: i64) -> Result<bool, StoreError> {
        Ok(self.count_approved_rated_reviews(content_id).await? > 0)
    }

    /// Store-wide totals and a sample review.
    async fn statistics(&self) -> Result<ReviewStatistics, StoreError>;
}

/// Read access to content metadata.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Looks up a published content item.
    async fn find_content(&self, content_id: i64) -> Result<Option<ContentItem>, StoreError>;

    /// Third-party schema list stored alongside the content, if any.
    async fn external_schemas(
        &self,
        content_id: i64,
    ) -> Result<Option<Vec<serde_json::Value>>, StoreError>;
}

/// Persistence of the admin settings.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the current settings, defaults when none were saved yet.
    async fn load(&self) -> Result<SchemaSettings, StoreError>;

    /// Replaces the stored settings.
    async fn save(&self, settings: SchemaSettings) -> Result<SchemaSettings, StoreError>;
}

/// Receives review store change notifications.
#[async_trait::async_trait]
pub trait ReviewObserver: Send + Sync {
    async fn review_changed(&self, event: ReviewEvent);
}
