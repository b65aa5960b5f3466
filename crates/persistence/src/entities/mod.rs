//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod content;
pub mod review;
pub mod schema_settings;

pub use content::{ContentItemEntity, ContentTermEntity};
pub use review::{ReviewSampleEntity, ReviewStatisticsEntity, ReviewTotalsEntity};
pub use schema_settings::SchemaSettingsEntity;
