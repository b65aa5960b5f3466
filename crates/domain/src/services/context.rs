//! Request-scoped state.

use std::collections::HashMap;

use super::fetcher::AggregateFetcher;
use super::integration::SchemaExtensionPoint;
use crate::models::SchemaSettings;

/// State shared by every step of rendering one page: a settings snapshot,
/// memoized review probes and the extension point handlers register on.
#[derive(Debug)]
pub struct RequestContext {
    settings: SchemaSettings,
    has_reviews: HashMap<i64, bool>,
    extension_point: SchemaExtensionPoint,
}

impl RequestContext {
    pub fn new(settings: SchemaSettings, extension_point: impl Into<String>) -> Self {
        Self {
            settings,
            has_reviews: HashMap::new(),
            extension_point: SchemaExtensionPoint::new(extension_point),
        }
    }

    pub fn settings(&self) -> &SchemaSettings {
        &self.settings
    }

    pub fn extension_point(&self) -> &SchemaExtensionPoint {
        &self.extension_point
    }

    pub fn extension_point_mut(&mut self) -> &mut SchemaExtensionPoint {
        &mut self.extension_point
    }

    /// Whether the content item has approved rated reviews, probing the
    /// store at most once per request.
    pub async fn has_rated_reviews(&mut self, fetcher: &AggregateFetcher, content_id: i64) -> bool {
        if let Some(found) = self.has_reviews.get(&content_id) {
            return *found;
        }
        let found = fetcher.probe_reviews(content_id).await;
        self.has_reviews.insert(content_id, found);
        found
    }
}
