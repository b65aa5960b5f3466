//! Review repository: read-only aggregate queries over the reviews table.

use sqlx::PgPool;

use crate::entities::{ReviewSampleEntity, ReviewStatisticsEntity, ReviewTotalsEntity};
use crate::metrics::QueryTimer;
use domain::models::{RatingTotals, ReviewStatistics};
use domain::services::ReviewStore;
use domain::StoreError;

use super::store_error;

/// Repository for review aggregate queries.
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ReviewStore for ReviewRepository {
    async fn is_available(&self) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("reviews_table_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT to_regclass('public.reviews') IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map_err(store_error)
    }

    async fn count_approved_rated_reviews(&self, content_id: i64) -> Result<i64, StoreError> {
        let timer = QueryTimer::new("count_approved_rated_reviews");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM reviews
            WHERE content_id = $1 AND approved = true AND rating > 0
            "#,
        )
        .bind(content_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map_err(store_error)
    }

    async fn average_rating(&self, content_id: i64) -> Result<Option<f64>, StoreError> {
        let timer = QueryTimer::new("average_rating");
        let result = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(rating)::DOUBLE PRECISION
            FROM reviews
            WHERE content_id = $1 AND approved = true AND rating > 0
            "#,
        )
        .bind(content_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map_err(store_error)
    }

    async fn aggregate(&self, content_id: i64) -> Result<RatingTotals, StoreError> {
        let timer = QueryTimer::new("review_aggregate");
        let result = sqlx::query_as::<_, ReviewTotalsEntity>(
            r#"
            SELECT COUNT(*) AS count, AVG(rating)::DOUBLE PRECISION AS average
            FROM reviews
            WHERE content_id = $1 AND approved = true AND rating > 0
            "#,
        )
        .bind(content_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map(Into::into).map_err(store_error)
    }

    async fn has_rated_reviews(&self, content_id: i64) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("has_rated_reviews");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reviews
                WHERE content_id = $1 AND approved = true AND rating > 0
            )
            "#,
        )
        .bind(content_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map_err(store_error)
    }

    async fn statistics(&self) -> Result<ReviewStatistics, StoreError> {
        let timer = QueryTimer::new("review_statistics");
        let counts = sqlx::query_as::<_, ReviewStatisticsEntity>(
            r#"
            SELECT COUNT(*) AS total_reviews,
                   COUNT(*) FILTER (WHERE approved = true) AS approved_reviews
            FROM reviews
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        let sample = sqlx::query_as::<_, ReviewSampleEntity>(
            r#"
            SELECT content_id, rating::DOUBLE PRECISION AS rating
            FROM reviews
            WHERE approved = true AND rating > 0
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        let (counts, sample) = timer
            .finish(counts.and_then(|counts| sample.map(|sample| (counts, sample))))
            .map_err(store_error)?;
        Ok(ReviewStatistics {
            total_reviews: counts.total_reviews,
            approved_reviews: counts.approved_reviews,
            sample: sample.map(Into::into),
        })
    }
}
