use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use domain::services::{
    ContentSource, InMemoryContentSource, InMemoryReviewStore, InMemorySettingsStore,
    MokaRatingCache, RatingSchemaService, ReviewStore, SettingsStore,
};
use persistence::repositories::{ContentRepository, ReviewRepository, SchemaSettingsRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{admin, content, health, integrations};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<RatingSchemaService>,
}

/// The external collaborators the pipeline runs against.
pub struct Collaborators {
    pub reviews: Arc<dyn ReviewStore>,
    pub content: Arc<dyn ContentSource>,
    pub settings: Arc<dyn SettingsStore>,
    /// Set when the review store delivers change events in-process.
    in_memory_reviews: Option<Arc<InMemoryReviewStore>>,
}

impl Collaborators {
    /// PostgreSQL-backed collaborators. Review changes arrive through the
    /// review event webhook.
    pub fn postgres(pool: PgPool, external_schema_meta_key: &str) -> Self {
        Self {
            reviews: Arc::new(ReviewRepository::new(pool.clone())),
            content: Arc::new(ContentRepository::with_meta_key(
                pool.clone(),
                external_schema_meta_key,
            )),
            settings: Arc::new(SchemaSettingsRepository::new(pool)),
            in_memory_reviews: None,
        }
    }

    /// In-process collaborators. The service subscribes to the review
    /// store's change events.
    pub fn in_memory(
        reviews: Arc<InMemoryReviewStore>,
        content: Arc<InMemoryContentSource>,
        settings: Arc<InMemorySettingsStore>,
    ) -> Self {
        Self {
            reviews: reviews.clone(),
            content,
            settings,
            in_memory_reviews: Some(reviews),
        }
    }
}

/// Builds the pipeline service with a moka cache sized from configuration.
pub fn build_service(config: &Config, collaborators: Collaborators) -> Arc<RatingSchemaService> {
    let cache = Arc::new(MokaRatingCache::new(config.cache.max_entries));
    let service = Arc::new(RatingSchemaService::new(
        collaborators.reviews,
        collaborators.content,
        collaborators.settings,
        cache,
        config.pipeline_options(),
    ));

    if let Some(reviews) = collaborators.in_memory_reviews {
        reviews.register_observer(service.clone());
    }

    tracing::info!(
        external_seo_present = service.capability().is_present(),
        extension_point = service.extension_point(),
        positive_ttl_secs = config.cache.positive_ttl_secs,
        negative_ttl_secs = config.cache.negative_ttl_secs,
        "Rating schema service ready"
    );

    service
}

pub fn create_app(config: Config, service: Arc<RatingSchemaService>) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        config: config.clone(),
        service,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Page output and integration hook (public)
    let public_routes = Router::new()
        .route("/api/v1/content/:id/schema", get(content::get_schema))
        .route("/api/v1/content/:id/rating", get(content::get_rating))
        .route(
            "/api/v1/content/:id/rating-badge",
            get(content::get_rating_badge),
        )
        .route(
            "/api/v1/integrations/seo/:content_id/schemas",
            post(integrations::filter_schemas),
        );

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/settings",
            get(admin::get_settings).put(admin::update_settings),
        )
        .route("/api/v1/admin/schema/preview", post(admin::preview_schema))
        .route("/api/v1/admin/diagnostics", get(admin::debug_report))
        .route(
            "/api/v1/admin/diagnostics/store",
            get(admin::store_diagnostics),
        )
        .route(
            "/api/v1/admin/diagnostics/content/:id",
            get(admin::content_diagnostics),
        )
        .route("/api/v1/admin/cache", delete(admin::clear_cache))
        .route("/api/v1/admin/cache/:id", delete(admin::invalidate_cache))
        .route("/api/v1/admin/reviews/events", post(admin::review_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        // Health and metrics (no auth)
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .merge(public_routes)
        .merge(admin_routes)
        // Global middleware (bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
