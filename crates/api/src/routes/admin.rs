//! Admin API routes: settings form, schema preview, diagnostics, cache.
//!
//! These routes sit behind [`require_admin`](crate::middleware::require_admin).

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    DebugReport, ReviewEvent, SchemaGenerationReport, SchemaPreviewRequest, SchemaPreviewResponse,
    SchemaSettings, SchemaSettingsResponse, StoreConnectionReport, UpdateSchemaSettingsRequest,
};
use domain::services::renderer::to_pretty_json;
use domain::services::{validate_schema, ReviewObserver};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminKeyAuth;
use crate::middleware::metrics::record_cache_invalidation;

fn settings_response(state: &AppState, settings: SchemaSettings) -> SchemaSettingsResponse {
    SchemaSettingsResponse::new(
        settings,
        state.service.site_name(),
        state.service.capability().is_present(),
    )
}

/// GET /api/v1/admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SchemaSettingsResponse>, ApiError> {
    let settings = state.service.load_settings().await?;
    Ok(Json(settings_response(&state, settings)))
}

/// PUT /api/v1/admin/settings
///
/// Replaces the settings. A missing `integration_enabled` turns the
/// integration off.
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminKeyAuth>,
    Json(request): Json<UpdateSchemaSettingsRequest>,
) -> Result<Json<SchemaSettingsResponse>, ApiError> {
    request.validate()?;

    let saved = state.service.save_settings(request.sanitize()).await?;

    info!(
        admin_key = %auth.key_fingerprint,
        mappings = saved.type_mappings.len(),
        "Updated schema settings"
    );

    Ok(Json(settings_response(&state, saved)))
}

/// POST /api/v1/admin/schema/preview
pub async fn preview_schema(
    State(state): State<AppState>,
    Json(request): Json<SchemaPreviewRequest>,
) -> Result<Json<SchemaPreviewResponse>, ApiError> {
    if request.content_id <= 0 {
        return Err(ApiError::Validation("Invalid content ID".to_string()));
    }

    let record = state
        .service
        .build_schema(request.content_id)
        .await
        .ok_or_else(|| ApiError::NotFound("No aggregate review data found".to_string()))?;

    let schema = to_pretty_json(&record)
        .map_err(|e| ApiError::Internal(format!("Schema serialization failed: {e}")))?;
    let value = serde_json::to_value(&record)
        .map_err(|e| ApiError::Internal(format!("Schema serialization failed: {e}")))?;

    Ok(Json(SchemaPreviewResponse {
        content_id: request.content_id,
        schema,
        validation: validate_schema(&value),
    }))
}

/// GET /api/v1/admin/diagnostics/store
pub async fn store_diagnostics(
    State(state): State<AppState>,
) -> Result<Json<StoreConnectionReport>, ApiError> {
    Ok(Json(state.service.connection_report().await?))
}

/// GET /api/v1/admin/diagnostics/content/:id
pub async fn content_diagnostics(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
) -> Json<SchemaGenerationReport> {
    Json(state.service.generation_report(content_id).await)
}

/// GET /api/v1/admin/diagnostics
pub async fn debug_report(State(state): State<AppState>) -> Json<DebugReport> {
    Json(state.service.debug_report(env!("CARGO_PKG_VERSION")).await)
}

/// DELETE /api/v1/admin/cache
pub async fn clear_cache(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminKeyAuth>,
) -> impl IntoResponse {
    state.service.clear_cache().await;
    record_cache_invalidation("admin_clear");
    info!(admin_key = %auth.key_fingerprint, "Cleared aggregate cache");
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/admin/cache/:id
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminKeyAuth>,
    Path(content_id): Path<i64>,
) -> impl IntoResponse {
    state.service.invalidate(content_id).await;
    record_cache_invalidation("admin");
    info!(admin_key = %auth.key_fingerprint, content_id, "Invalidated aggregate cache entry");
    StatusCode::NO_CONTENT
}

/// POST /api/v1/admin/reviews/events
///
/// Review change notification from the review system. Events without a
/// content ID are accepted and ignored.
pub async fn review_event(
    State(state): State<AppState>,
    Json(event): Json<ReviewEvent>,
) -> impl IntoResponse {
    if event.content_id.is_some() {
        record_cache_invalidation("review_event");
    }
    state.service.review_changed(event).await;
    StatusCode::ACCEPTED
}
