//! The rating schema pipeline.
//!
//! Fetcher, builder, dispatcher and renderer wired together behind one
//! service object that is constructed at startup and shared by handlers.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cache::{CacheTtl, RatingCache};
use super::context::RequestContext;
use super::fetcher::AggregateFetcher;
use super::integration::{IntegrationDispatcher, RenderPlan, SeoCapability, DEFAULT_EXTENSION_POINT};
use super::renderer;
use super::schema_builder::SchemaBuilder;
use super::store::{ContentSource, ReviewObserver, ReviewStore, SettingsStore};
use crate::errors::StoreError;
use crate::models::{
    AggregateRecord, CachePolicyInfo, ContentItem, DebugReport, ReviewEvent, SampleReviewInfo,
    SchemaGenerationReport, SchemaRecord, SchemaSettings, StoreConnectionReport, StoreDebugInfo,
};

/// Startup options of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Fallback organization name for creative works.
    pub site_name: String,
    pub ttl: CacheTtl,
    pub capability: SeoCapability,
    pub extension_point: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            site_name: String::new(),
            ttl: CacheTtl::default(),
            capability: SeoCapability::absent(),
            extension_point: DEFAULT_EXTENSION_POINT.to_string(),
        }
    }
}

/// Head markup for one content item.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadOutput {
    pub plan: RenderPlan,
    /// The framed JSON-LD block, when the plan emits one.
    pub markup: Option<String>,
}

/// Aggregate rating schema service.
pub struct RatingSchemaService {
    fetcher: AggregateFetcher,
    reviews: Arc<dyn ReviewStore>,
    content: Arc<dyn ContentSource>,
    settings: Arc<dyn SettingsStore>,
    builder: SchemaBuilder,
    dispatcher: IntegrationDispatcher,
    extension_point: String,
}

impl RatingSchemaService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        content: Arc<dyn ContentSource>,
        settings: Arc<dyn SettingsStore>,
        cache: Arc<dyn RatingCache>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            fetcher: AggregateFetcher::new(reviews.clone(), cache, options.ttl),
            reviews,
            content,
            settings,
            builder: SchemaBuilder::new(options.site_name),
            dispatcher: IntegrationDispatcher::new(options.capability),
            extension_point: options.extension_point,
        }
    }

    pub fn capability(&self) -> SeoCapability {
        self.dispatcher.capability()
    }

    pub fn site_name(&self) -> &str {
        self.builder.site_name()
    }

    pub fn extension_point(&self) -> &str {
        &self.extension_point
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        self.fetcher.ttl()
    }

    /// Current settings, or the defaults if they cannot be loaded.
    pub async fn current_settings(&self) -> SchemaSettings {
        match self.settings.load().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "Failed to load settings, using defaults");
                SchemaSettings::default()
            }
        }
    }

    /// Loads settings, surfacing store errors to the caller.
    pub async fn load_settings(&self) -> Result<SchemaSettings, StoreError> {
        self.settings.load().await
    }

    pub async fn save_settings(&self, settings: SchemaSettings) -> Result<SchemaSettings, StoreError> {
        let saved = self.settings.save(settings).await?;
        info!(
            mappings = saved.type_mappings.len(),
            integration_enabled = saved.integration_enabled,
            "Schema settings saved"
        );
        Ok(saved)
    }

    /// Starts a request with a fresh settings snapshot.
    pub async fn begin_request(&self) -> RequestContext {
        RequestContext::new(self.current_settings().await, self.extension_point.clone())
    }

    /// Looks up a content item; lookup failures count as missing.
    pub async fn find_content(&self, content_id: i64) -> Option<ContentItem> {
        if content_id <= 0 {
            return None;
        }
        match self.content.find_content(content_id).await {
            Ok(item) => item,
            Err(err) => {
                warn!(content_id, error = %err, "Content lookup failed");
                None
            }
        }
    }

    async fn stored_external_schemas(&self, content_id: i64) -> Option<Vec<Value>> {
        match self.content.external_schemas(content_id).await {
            Ok(list) => list,
            Err(err) => {
                warn!(content_id, error = %err, "Stored schema lookup failed");
                None
            }
        }
    }

    /// Aggregate for an existing content item, `None` otherwise.
    pub async fn fetch_aggregate(&self, content_id: i64) -> Option<AggregateRecord> {
        self.find_content(content_id).await?;
        self.fetcher.fetch(content_id).await
    }

    /// Builds the schema record with the current settings.
    pub async fn build_schema(&self, content_id: i64) -> Option<SchemaRecord> {
        let settings = self.current_settings().await;
        self.build_with(&settings, content_id).await
    }

    async fn build_with(&self, settings: &SchemaSettings, content_id: i64) -> Option<SchemaRecord> {
        let content = self.find_content(content_id).await?;
        let aggregate = self.fetcher.fetch(content_id).await?;
        Some(self.builder.build(&content, &aggregate, settings))
    }

    /// Decides how the rating for `content_id` is emitted.
    pub async fn dispatch(&self, ctx: &mut RequestContext, content_id: i64) -> RenderPlan {
        let Some(content) = self.find_content(content_id).await else {
            return RenderPlan::Suppressed;
        };
        let Some(aggregate) = self.fetcher.fetch(content_id).await else {
            return RenderPlan::Suppressed;
        };
        let fragment = aggregate.rating_fragment();

        let stored = if self.dispatcher.wants_stored_schemas(ctx.settings()) {
            self.stored_external_schemas(content_id).await
        } else {
            None
        };

        let settings = ctx.settings().clone();
        let builder = &self.builder;
        self.dispatcher.dispatch(ctx, content_id, &fragment, stored, || {
            Some(builder.build(&content, &aggregate, &settings))
        })
    }

    /// Gated dispatch used for page output.
    pub async fn plan_output(&self, ctx: &mut RequestContext, content_id: i64) -> RenderPlan {
        let Some(content) = self.find_content(content_id).await else {
            return RenderPlan::Suppressed;
        };
        if !ctx.settings().is_output_enabled_for(&content.content_type) {
            debug!(content_id, content_type = %content.content_type, "Schema output disabled for content type");
            return RenderPlan::Suppressed;
        }
        if !ctx.has_rated_reviews(&self.fetcher, content_id).await {
            return RenderPlan::Suppressed;
        }
        self.dispatch(ctx, content_id).await
    }

    /// Full head output: context, gate, dispatch, render.
    pub async fn render_head(&self, content_id: i64) -> HeadOutput {
        let mut ctx = self.begin_request().await;
        let plan = self.plan_output(&mut ctx, content_id).await;
        let markup = renderer::render(&plan);
        debug!(content_id, plan = plan.label(), "Head output planned");
        HeadOutput { plan, markup }
    }

    /// Runs a third-party schema list through the merge handler the
    /// pipeline registers for this content item. Returns the list
    /// unchanged when no handler was registered.
    pub async fn merge_external(&self, content_id: i64, schemas: Vec<Value>) -> Vec<Value> {
        let mut ctx = self.begin_request().await;
        let plan = self.plan_output(&mut ctx, content_id).await;
        debug!(content_id, plan = plan.label(), entries = schemas.len(), "Applying schema extension point");
        ctx.extension_point().apply(schemas, content_id)
    }

    pub async fn invalidate(&self, content_id: i64) {
        self.fetcher.invalidate(content_id).await;
        debug!(content_id, "Aggregate cache invalidated");
    }

    pub async fn clear_cache(&self) {
        self.fetcher.clear().await;
        info!("Aggregate cache cleared");
    }

    pub async fn store_available(&self) -> bool {
        self.fetcher.store_available().await
    }

    /// Probes the review store without consulting the memoized answer.
    pub async fn check_store(&self) -> Result<bool, StoreError> {
        self.reviews.is_available().await
    }

    /// Store connectivity test for the admin diagnostics.
    pub async fn connection_report(&self) -> Result<StoreConnectionReport, StoreError> {
        if !self.store_available().await {
            return Err(StoreError::Unavailable(
                "review table does not exist".to_string(),
            ));
        }
        let stats = self.reviews.statistics().await?;
        let sample = match stats.sample {
            Some(sample) => {
                let content_title = self.find_content(sample.content_id).await.map(|c| c.title);
                Some(SampleReviewInfo {
                    content_id: sample.content_id,
                    rating: sample.rating,
                    content_title,
                })
            }
            None => None,
        };
        Ok(StoreConnectionReport {
            store_available: true,
            approved_review_count: stats.approved_reviews,
            sample,
        })
    }

    /// Step-by-step schema generation test for one content item.
    pub async fn generation_report(&self, content_id: i64) -> SchemaGenerationReport {
        let mut report = SchemaGenerationReport {
            content_id,
            content_title: None,
            content_type: None,
            aggregate: None,
            schema_generated: false,
            schema: None,
            errors: Vec::new(),
        };

        let Some(content) = self.find_content(content_id).await else {
            report.errors.push("Content not found".to_string());
            return report;
        };
        report.content_title = Some(content.title.clone());
        report.content_type = Some(content.content_type.clone());

        if !self.store_available().await {
            report.errors.push("Review store is not available".to_string());
            return report;
        }

        let Some(aggregate) = self.fetcher.fetch(content_id).await else {
            report.errors.push("No aggregate data found".to_string());
            return report;
        };
        report.aggregate = Some(aggregate.clone());

        let settings = self.current_settings().await;
        let record = self.builder.build(&content, &aggregate, &settings);
        match serde_json::to_value(&record) {
            Ok(value) => {
                report.schema_generated = true;
                report.schema = Some(value);
            }
            Err(err) => report.errors.push(format!("Schema serialization failed: {err}")),
        }
        report
    }

    /// Configuration and store summary for the admin diagnostics.
    pub async fn debug_report(&self, version: &str) -> DebugReport {
        let available = self.store_available().await;
        let stats = if available {
            match self.reviews.statistics().await {
                Ok(stats) => Some(stats),
                Err(err) => {
                    warn!(error = %err, "Failed to read review statistics");
                    None
                }
            }
        } else {
            None
        };
        let ttl = self.cache_ttl();

        DebugReport {
            version: version.to_string(),
            site_name: self.site_name().to_string(),
            store: StoreDebugInfo {
                available,
                total_reviews: stats.as_ref().map(|s| s.total_reviews),
                approved_reviews: stats.as_ref().map(|s| s.approved_reviews),
            },
            settings: self.current_settings().await,
            external_seo_present: self.capability().is_present(),
            extension_point: self.extension_point.clone(),
            cache: CachePolicyInfo {
                positive_ttl_secs: ttl.positive.as_secs(),
                negative_ttl_secs: ttl.negative.as_secs(),
            },
        }
    }
}

#[async_trait::async_trait]
impl ReviewObserver for RatingSchemaService {
    async fn review_changed(&self, event: ReviewEvent) {
        match event.content_id {
            Some(content_id) => {
                debug!(content_id, action = %event.action, "Review changed");
                self.invalidate(content_id).await;
            }
            None => debug!(action = %event.action, "Review changed without content ID, cache left to expire"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SchemaDocument, TaxonomyTerm};
    use crate::services::memory::{
        InMemoryContentSource, InMemoryReviewStore, InMemorySettingsStore, RecordingCache,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    struct Fixture {
        reviews: Arc<InMemoryReviewStore>,
        content: Arc<InMemoryContentSource>,
        settings: Arc<InMemorySettingsStore>,
        cache: Arc<RecordingCache>,
    }

    impl Fixture {
        fn new(settings: SchemaSettings) -> Self {
            Self {
                reviews: Arc::new(InMemoryReviewStore::new()),
                content: Arc::new(InMemoryContentSource::new()),
                settings: Arc::new(InMemorySettingsStore::new(settings)),
                cache: Arc::new(RecordingCache::new()),
            }
        }

        fn service(&self, capability: SeoCapability) -> Arc<RatingSchemaService> {
            let service = Arc::new(RatingSchemaService::new(
                self.reviews.clone(),
                self.content.clone(),
                self.settings.clone(),
                self.cache.clone(),
                PipelineOptions {
                    site_name: "Example Site".to_string(),
                    capability,
                    ..PipelineOptions::default()
                },
            ));
            self.reviews.register_observer(service.clone());
            service
        }

        fn add_content(&self, id: i64, content_type: &str, title: &str) {
            self.content.insert(ContentItem {
                id,
                title: title.to_string(),
                permalink: format!("https://example.com/{id}"),
                content_type: content_type.to_string(),
                excerpt: Some("<p>Excerpt</p>".to_string()),
                thumbnail_url: None,
                published_at: Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).unwrap(),
                terms: vec![TaxonomyTerm::new("genre", "Drama")],
            });
        }
    }

    fn mapped(pairs: &[(&str, &str)]) -> SchemaSettings {
        SchemaSettings {
            type_mappings: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..SchemaSettings::default()
        }
    }

    #[tokio::test]
    async fn test_movie_schema_for_scenario_a() {
        let fx = Fixture::new(mapped(&[("anime", "Movie")]));
        fx.add_content(42, "anime", "Film");
        for rating in [80.0, 90.0, 100.0] {
            fx.reviews.add_review(42, rating, true).await;
        }
        let service = fx.service(SeoCapability::absent());

        let record = service.build_schema(42).await.unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["@type"], "Movie");
        assert_eq!(
            json["aggregateRating"],
            json!({
                "@type": "AggregateRating",
                "ratingValue": 90.0,
                "bestRating": 100,
                "worstRating": 1,
                "ratingCount": 3,
                "reviewCount": 3
            })
        );
        assert_eq!(json["author"]["name"], "Example Site");
    }

    #[tokio::test]
    async fn test_no_reviews_renders_nothing() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.add_content(7, "post", "Quiet");
        let service = fx.service(SeoCapability::absent());

        assert!(service.fetch_aggregate(7).await.is_none());
        assert!(service.build_schema(7).await.is_none());
        let head = service.render_head(7).await;
        assert_eq!(head.plan, RenderPlan::Suppressed);
        assert!(head.markup.is_none());
    }

    #[tokio::test]
    async fn test_missing_content_is_absent() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.reviews.add_review(99, 80.0, true).await;
        let service = fx.service(SeoCapability::absent());

        assert!(service.fetch_aggregate(99).await.is_none());
        assert!(service.build_schema(99).await.is_none());
    }

    #[tokio::test]
    async fn test_build_is_stable_without_review_changes() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.add_content(5, "post", "Post");
        fx.reviews.add_review(5, 76.3, true).await;
        let service = fx.service(SeoCapability::absent());

        let first = serde_json::to_string(&service.build_schema(5).await).unwrap();
        let queries = fx.reviews.aggregate_queries();
        let second = serde_json::to_string(&service.build_schema(5).await).unwrap();

        assert_eq!(first, second);
        assert_eq!(fx.reviews.aggregate_queries(), queries);
    }

    #[tokio::test]
    async fn test_review_change_invalidates_cache() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.add_content(5, "post", "Post");
        fx.reviews.add_review(5, 60.0, true).await;
        let service = fx.service(SeoCapability::absent());

        assert_eq!(service.fetch_aggregate(5).await.unwrap().review_count, 1);
        fx.reviews.add_review(5, 100.0, true).await;
        let record = service.fetch_aggregate(5).await.unwrap();
        assert_eq!(record.review_count, 2);
        assert_eq!(record.average_rating, 80.0);
    }

    #[tokio::test]
    async fn test_render_head_gates_on_content_type() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.add_content(1, "post", "Enabled");
        fx.add_content(2, "page", "Disabled");
        fx.reviews.add_review(1, 80.0, true).await;
        fx.reviews.add_review(2, 80.0, true).await;
        let service = fx.service(SeoCapability::absent());

        let enabled = service.render_head(1).await;
        assert!(enabled.markup.unwrap().contains("\"itemReviewed\""));
        assert_eq!(service.render_head(2).await.plan, RenderPlan::Suppressed);
    }

    #[tokio::test]
    async fn test_render_head_with_mappings_requires_entry() {
        let fx = Fixture::new(mapped(&[("anime", "TVSeries")]));
        fx.add_content(1, "post", "Unmapped");
        fx.add_content(2, "anime", "Series");
        fx.reviews.add_review(1, 80.0, true).await;
        fx.reviews.add_review(2, 80.0, true).await;
        let service = fx.service(SeoCapability::absent());

        assert_eq!(service.render_head(1).await.plan, RenderPlan::Suppressed);
        let markup = service.render_head(2).await.markup.unwrap();
        assert!(markup.contains("\"TVSeries\""));
    }

    #[tokio::test]
    async fn test_merge_path_emits_nothing_and_merges_external_list() {
        let fx = Fixture::new(mapped(&[("anime", "TVSeries")]));
        fx.add_content(42, "anime", "X");
        fx.reviews.add_review(42, 90.0, true).await;
        let service = fx.service(SeoCapability::present());

        let head = service.render_head(42).await;
        assert!(matches!(head.plan, RenderPlan::MergeIntoExternal(_)));
        assert!(head.markup.is_none());

        let merged = service
            .merge_external(42, vec![json!({"@type": "TVSeries", "name": "X"})])
            .await;
        assert_eq!(merged[0]["name"], "X");
        assert_eq!(merged[0]["aggregateRating"]["ratingValue"], json!(90.0));
    }

    #[tokio::test]
    async fn test_merge_external_passes_through_without_reviews() {
        let fx = Fixture::new(mapped(&[("anime", "TVSeries")]));
        fx.add_content(42, "anime", "X");
        let service = fx.service(SeoCapability::present());

        let list = vec![json!({"@type": "TVSeries", "name": "X"})];
        assert_eq!(service.merge_external(42, list.clone()).await, list);
    }

    #[tokio::test]
    async fn test_stored_external_list_is_spliced() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.add_content(3, "post", "Stored");
        fx.reviews.add_review(3, 70.0, true).await;
        fx.content.set_external_schemas(
            3,
            vec![
                json!({"@type": "WebPage"}),
                json!({"@type": "Product", "name": "Stored"}),
            ],
        );
        let service = fx.service(SeoCapability::absent());
        let mut ctx = service.begin_request().await;

        let plan = service.dispatch(&mut ctx, 3).await;
        let RenderPlan::Standalone(SchemaDocument::Graph(list)) = plan else {
            panic!("expected spliced graph");
        };
        assert!(list[0].get("aggregateRating").is_none());
        assert_eq!(list[1]["aggregateRating"]["ratingCount"], json!(1));
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let fx = Fixture::new(SchemaSettings::default());
        fx.add_content(5, "post", "Sampled");
        fx.reviews.add_review(5, 88.0, true).await;
        let service = fx.service(SeoCapability::absent());

        let connection = service.connection_report().await.unwrap();
        assert_eq!(connection.approved_review_count, 1);
        assert_eq!(
            connection.sample.unwrap().content_title.as_deref(),
            Some("Sampled")
        );

        let generation = service.generation_report(5).await;
        assert!(generation.schema_generated);
        assert!(generation.errors.is_empty());

        let missing = service.generation_report(404).await;
        assert_eq!(missing.errors, vec!["Content not found"]);

        let debug = service.debug_report("1.0.0").await;
        assert!(debug.store.available);
        assert_eq!(debug.cache.positive_ttl_secs, 300);
        assert_eq!(debug.extension_point, DEFAULT_EXTENSION_POINT);
    }

    #[tokio::test]
    async fn test_connection_report_fails_without_store() {
        let fx = Fixture {
            reviews: Arc::new(InMemoryReviewStore::unavailable()),
            ..Fixture::new(SchemaSettings::default())
        };
        let service = fx.service(SeoCapability::absent());
        assert!(matches!(
            service.connection_report().await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
