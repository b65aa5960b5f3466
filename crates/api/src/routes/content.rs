//! Page output endpoints: head schema block, rating data and badge.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::models::AggregateRecord;
use domain::services::{render_badge, BadgeStyle, FormattedRatings, DEFAULT_BADGE_CLASS};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_schema_plan;

/// Response header naming the plan when no block is emitted.
pub const SCHEMA_PLAN_HEADER: &str = "x-schema-plan";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// GET /api/v1/content/:id/schema
///
/// The framed JSON-LD block for the page head, or 204 with the plan name.
pub async fn get_schema(State(state): State<AppState>, Path(content_id): Path<i64>) -> Response {
    let output = state.service.render_head(content_id).await;
    let plan = output.plan.label();
    record_schema_plan(plan);

    match output.markup {
        Some(markup) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
            markup,
        )
            .into_response(),
        None => (
            StatusCode::NO_CONTENT,
            [(
                HeaderName::from_static(SCHEMA_PLAN_HEADER),
                HeaderValue::from_static(plan),
            )],
        )
            .into_response(),
    }
}

/// Aggregate rating of one content item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RatingResponse {
    pub content_id: i64,
    pub review_count: u64,
    pub average_rating: f64,
    pub best_rating: u32,
    pub worst_rating: u32,
    pub formatted: FormattedRatings,
}

impl RatingResponse {
    fn new(content_id: i64, record: &AggregateRecord) -> Self {
        Self {
            content_id,
            review_count: record.review_count,
            average_rating: record.average_rating,
            best_rating: record.best_rating,
            worst_rating: record.worst_rating,
            formatted: FormattedRatings::new(record),
        }
    }
}

/// GET /api/v1/content/:id/rating
pub async fn get_rating(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
) -> Result<Json<RatingResponse>, ApiError> {
    let record = state
        .service
        .fetch_aggregate(content_id)
        .await
        .ok_or_else(|| ApiError::NotFound("No aggregate review data found".to_string()))?;

    Ok(Json(RatingResponse::new(content_id, &record)))
}

#[derive(Debug, Default, Deserialize)]
pub struct BadgeQuery {
    #[serde(default)]
    pub show: BadgeStyle,
    pub class: Option<String>,
}

/// GET /api/v1/content/:id/rating-badge
///
/// HTML badge, or an empty 204 when there is no rating.
pub async fn get_rating_badge(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
    Query(query): Query<BadgeQuery>,
) -> Response {
    let Some(record) = state.service.fetch_aggregate(content_id).await else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let class = query
        .class
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_BADGE_CLASS);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
        render_badge(&record, query.show, class),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::RatingTotals;

    #[test]
    fn test_rating_response_shape() {
        let record = AggregateRecord::from_totals(RatingTotals {
            count: 3,
            average: Some(90.0),
        })
        .unwrap();
        let json = serde_json::to_value(RatingResponse::new(42, &record)).unwrap();

        assert_eq!(json["content_id"], 42);
        assert_eq!(json["review_count"], 3);
        assert_eq!(json["best_rating"], 100);
        assert_eq!(json["worst_rating"], 1);
        assert_eq!(json["formatted"]["percentage"], "90%");
        assert_eq!(json["formatted"]["stars"], "4.5");
        assert_eq!(json["formatted"]["raw"], "90");
    }

    #[test]
    fn test_badge_query_defaults() {
        let query: BadgeQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.show, BadgeStyle::All);
        assert!(query.class.is_none());
    }
}
