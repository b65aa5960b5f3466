//! Review aggregate rows.

use sqlx::FromRow;

/// Count and mean of approved, rated reviews for one content item.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReviewTotalsEntity {
    pub count: i64,
    pub average: Option<f64>,
}

impl From<ReviewTotalsEntity> for domain::models::RatingTotals {
    fn from(entity: ReviewTotalsEntity) -> Self {
        Self {
            count: entity.count,
            average: entity.average,
        }
    }
}

/// Store-wide review counters.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReviewStatisticsEntity {
    pub total_reviews: i64,
    pub approved_reviews: i64,
}

/// Most recent approved, rated review.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReviewSampleEntity {
    pub content_id: i64,
    pub rating: f64,
}

impl From<ReviewSampleEntity> for domain::models::ReviewSample {
    fn from(entity: ReviewSampleEntity) -> Self {
        Self {
            content_id: entity.content_id,
            rating: entity.rating,
        }
    }
}
