//! Hook endpoint for the external SEO component.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::app::AppState;

/// POST /api/v1/integrations/seo/:content_id/schemas
///
/// Takes the schema list the external component is about to print and
/// returns it with the aggregate rating merged in, when the pipeline
/// registered a merge handler for this content item. Otherwise the list
/// comes back unchanged.
pub async fn filter_schemas(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
    Json(schemas): Json<Vec<Value>>,
) -> Json<Vec<Value>> {
    let entries = schemas.len();
    let merged = state.service.merge_external(content_id, schemas).await;
    debug!(content_id, entries, "External schema list filtered");
    Json(merged)
}
