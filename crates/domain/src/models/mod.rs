//! Domain models for the rating schema service.

pub mod aggregate;
pub mod content;
pub mod diagnostics;
pub mod review;
pub mod schema;
pub mod settings;

pub use aggregate::{cache_key, AggregateRecord, RatingFragment, RatingTotals};
pub use content::{ContentItem, TaxonomyTerm};
pub use diagnostics::{
    CachePolicyInfo, DebugReport, SampleReviewInfo, SchemaGenerationReport,
    SchemaPreviewRequest, SchemaPreviewResponse, SchemaValidationReport, StoreConnectionReport,
    StoreDebugInfo,
};
pub use review::{ReviewAction, ReviewEvent, ReviewSample, ReviewStatistics};
pub use schema::{
    EntityRecord, ItemReviewed, OrganizationRef, RatingOnlyRecord, SchemaDocument, SchemaRecord,
};
pub use settings::{SchemaSettings, SchemaSettingsResponse, UpdateSchemaSettingsRequest};
