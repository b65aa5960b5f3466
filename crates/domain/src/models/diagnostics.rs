//! Diagnostic report models for the admin endpoints.

use serde::{Deserialize, Serialize};

use super::aggregate::AggregateRecord;
use super::settings::SchemaSettings;

/// Request to preview the schema of one content item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaPreviewRequest {
    #[serde(default)]
    pub content_id: i64,
}

/// Outcome of the schema structure checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaValidationReport {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for SchemaValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl SchemaValidationReport {
    pub fn error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Preview of the generated schema for one content item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaPreviewResponse {
    pub content_id: i64,
    /// Pretty-printed JSON-LD.
    pub schema: String,
    pub validation: SchemaValidationReport,
}

/// A sample review with its content title, for the connectivity test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SampleReviewInfo {
    pub content_id: i64,
    pub rating: f64,
    pub content_title: Option<String>,
}

/// Result of the review store connectivity test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConnectionReport {
    pub store_available: bool,
    pub approved_review_count: i64,
    pub sample: Option<SampleReviewInfo>,
}

/// Step-by-step schema generation test for one content item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaGenerationReport {
    pub content_id: i64,
    pub content_title: Option<String>,
    pub content_type: Option<String>,
    pub aggregate: Option<AggregateRecord>,
    pub schema_generated: bool,
    pub schema: Option<serde_json::Value>,
    pub errors: Vec<String>,
}

/// Cache policy as configured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CachePolicyInfo {
    pub positive_ttl_secs: u64,
    pub negative_ttl_secs: u64,
}

/// Review store section of the debug report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreDebugInfo {
    pub available: bool,
    pub total_reviews: Option<i64>,
    pub approved_reviews: Option<i64>,
}

/// Everything an operator needs to see when output looks wrong.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DebugReport {
    pub version: String,
    pub site_name: String,
    pub store: StoreDebugInfo,
    pub settings: SchemaSettings,
    pub external_seo_present: bool,
    pub extension_point: String,
    pub cache: CachePolicyInfo,
}
