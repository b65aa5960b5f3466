//! Content item metadata consumed by the schema builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A taxonomy term attached to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaxonomyTerm {
    pub taxonomy: String,
    pub name: String,
}

impl TaxonomyTerm {
    pub fn new(taxonomy: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            name: name.into(),
        }
    }
}

/// A published content item (post, page, anime entry, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub permalink: String,
    /// Content type identifier used to select a schema type mapping.
    pub content_type: String,
    /// Raw excerpt, may contain markup.
    pub excerpt: Option<String>,
    /// URL of the large-size thumbnail image.
    pub thumbnail_url: Option<String>,
    pub published_at: DateTime<Utc>,
    /// Terms in display order.
    #[serde(default)]
    pub terms: Vec<TaxonomyTerm>,
}

impl ContentItem {
    /// Names of the terms in one taxonomy, in display order.
    pub fn term_names(&self, taxonomy: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|t| t.taxonomy == taxonomy)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Publish date formatted as `YYYY-MM-DD`.
    pub fn publish_date(&self) -> String {
        self.published_at.format("%Y-%m-%d").to_string()
    }
}
