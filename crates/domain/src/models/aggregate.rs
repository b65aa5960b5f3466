//! Aggregate rating domain models.
//!
//! Ratings are stored on a percentage scale, so the aggregate is bounded
//! by a best rating of 100 and a worst rating of 1.

use serde::{Deserialize, Serialize};
use shared::text::round_to;

/// Highest possible rating on the percentage scale.
pub const BEST_RATING: u32 = 100;

/// Lowest possible rating on the percentage scale.
pub const WORST_RATING: u32 = 1;

/// Schema.org type name of the rating fragment.
pub const AGGREGATE_RATING_TYPE: &str = "AggregateRating";

/// Builds the cache key for a content item's aggregate.
pub fn cache_key(content_id: i64) -> String {
    format!("rating:{}", content_id)
}

/// Raw totals as returned by the review store's aggregate query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingTotals {
    /// Number of approved reviews with a rating above zero.
    pub count: i64,
    /// Mean rating of those reviews, `None` when there are none.
    pub average: Option<f64>,
}

/// Count and mean of approved, rated reviews for one content item.
///
/// Never constructed with a zero count: an item without qualifying reviews
/// has no aggregate at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AggregateRecord {
    pub review_count: u64,
    /// Mean rating, already on the 1-100 scale.
    pub average_rating: f64,
    pub best_rating: u32,
    pub worst_rating: u32,
}

impl AggregateRecord {
    /// Builds a record from store totals.
    ///
    /// Returns `None` when the count is zero (or negative) or the store
    /// reported no average. The average itself is passed through as-is.
    pub fn from_totals(totals: RatingTotals) -> Option<Self> {
        if totals.count <= 0 {
            return None;
        }
        let average_rating = totals.average?;
        Some(Self {
            review_count: totals.count as u64,
            average_rating,
            best_rating: BEST_RATING,
            worst_rating: WORST_RATING,
        })
    }

    /// Shapes the record into a schema.org `AggregateRating` fragment.
    pub fn rating_fragment(&self) -> RatingFragment {
        RatingFragment {
            schema_type: AGGREGATE_RATING_TYPE.to_string(),
            rating_value: round_to(self.average_rating, 1),
            best_rating: self.best_rating,
            worst_rating: self.worst_rating,
            rating_count: self.review_count,
            review_count: self.review_count,
        }
    }
}

/// The schema.org `AggregateRating` object nested inside entity records
/// and spliced into third-party schema lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingFragment {
    #[serde(rename = "@type")]
    pub schema_type: String,
    /// Mean rating rounded to one decimal place.
    pub rating_value: f64,
    pub best_rating: u32,
    pub worst_rating: u32,
    pub rating_count: u64,
    pub review_count: u64,
}
