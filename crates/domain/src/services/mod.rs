//! Domain services for the rating schema pipeline.
//!
//! Services contain the aggregation and rendering logic that operates on
//! domain models through the collaborator traits in [`store`].

pub mod cache;
pub mod context;
pub mod display;
pub mod fetcher;
pub mod integration;
pub mod memory;
pub mod pipeline;
pub mod renderer;
pub mod schema_builder;
pub mod schema_validation;
pub mod store;

pub use cache::{CacheTtl, CachedAggregate, MokaRatingCache, RatingCache};
pub use context::RequestContext;
pub use display::{
    format_rating, render_badge, BadgeStyle, FormattedRatings, RatingFormat, DEFAULT_BADGE_CLASS,
};
pub use fetcher::AggregateFetcher;
pub use integration::{
    merge_rating, HandlerRegistration, IntegrationDispatcher, RatingMergeHandler, RenderPlan,
    SchemaExtensionPoint, SchemaOutputFilter, SeoCapability, DEFAULT_EXTENSION_POINT,
};
pub use memory::{InMemoryContentSource, InMemoryReviewStore, InMemorySettingsStore, RecordingCache};
pub use pipeline::{HeadOutput, PipelineOptions, RatingSchemaService};
pub use schema_builder::SchemaBuilder;
pub use schema_validation::validate_schema;
pub use store::{ContentSource, ReviewObserver, ReviewStore, SettingsStore};
