//! Third-party SEO schema integration.
//!
//! When an external SEO component owns the page's schema output, the
//! rating is merged into its schema list through a named extension point
//! instead of being emitted as a separate block.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::context::RequestContext;
use crate::models::schema::is_mergeable;
use crate::models::{RatingFragment, SchemaDocument, SchemaRecord, SchemaSettings};

/// Name of the extension point the external SEO component consults.
pub const DEFAULT_EXTENSION_POINT: &str = "slim_seo_schema_output";

/// Property the rating is stored under in merged entries.
const AGGREGATE_RATING_KEY: &str = "aggregateRating";

/// Whether the external SEO component is active in this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeoCapability {
    present: bool,
}

impl SeoCapability {
    pub fn present() -> Self {
        Self { present: true }
    }

    pub fn absent() -> Self {
        Self { present: false }
    }

    pub fn from_flag(present: bool) -> Self {
        Self { present }
    }

    pub fn is_present(&self) -> bool {
        self.present
    }
}

/// Callback registered on the extension point.
pub trait SchemaOutputFilter: Send + Sync {
    /// Receives the external schema list and returns the list to emit.
    fn filter(&self, schemas: Vec<Value>, content_id: i64) -> Vec<Value>;
}

/// Splices a precomputed rating fragment into mergeable entries.
#[derive(Debug, Clone)]
pub struct RatingMergeHandler {
    fragment: RatingFragment,
}

impl RatingMergeHandler {
    pub fn new(fragment: RatingFragment) -> Self {
        Self { fragment }
    }
}

impl SchemaOutputFilter for RatingMergeHandler {
    fn filter(&self, schemas: Vec<Value>, _content_id: i64) -> Vec<Value> {
        merge_rating(schemas, &self.fragment)
    }
}

/// Sets `aggregateRating` on every object entry whose `@type` is in the
/// mergeable allow-list. Other entries pass through untouched.
pub fn merge_rating(mut schemas: Vec<Value>, fragment: &RatingFragment) -> Vec<Value> {
    let rating = match serde_json::to_value(fragment) {
        Ok(rating) => rating,
        Err(err) => {
            warn!(error = %err, "Failed to serialize rating fragment");
            return schemas;
        }
    };

    for entry in schemas.iter_mut() {
        let Some(object) = entry.as_object_mut() else {
            continue;
        };
        let mergeable = object
            .get("@type")
            .and_then(Value::as_str)
            .map(is_mergeable)
            .unwrap_or(false);
        if mergeable {
            object.insert(AGGREGATE_RATING_KEY.to_string(), rating.clone());
        }
    }

    schemas
}

/// Receipt for a handler registered on the extension point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRegistration {
    pub extension_point: String,
    pub content_id: i64,
}

/// Named extension point holding at most one output filter.
///
/// Lives inside a [`RequestContext`], so a registration never outlives the
/// request that made it.
pub struct SchemaExtensionPoint {
    name: String,
    handler: Option<Arc<dyn SchemaOutputFilter>>,
}

impl SchemaExtensionPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Registers `handler`, replacing any earlier one.
    pub fn register(
        &mut self,
        content_id: i64,
        handler: Arc<dyn SchemaOutputFilter>,
    ) -> HandlerRegistration {
        if self.handler.replace(handler).is_some() {
            debug!(extension_point = %self.name, "Replaced schema output handler");
        }
        HandlerRegistration {
            extension_point: self.name.clone(),
            content_id,
        }
    }

    /// Runs the external schema list through the registered handler.
    /// Without a handler the list is returned unchanged.
    pub fn apply(&self, schemas: Vec<Value>, content_id: i64) -> Vec<Value> {
        match &self.handler {
            Some(handler) => handler.filter(schemas, content_id),
            None => schemas,
        }
    }
}

impl std::fmt::Debug for SchemaExtensionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaExtensionPoint")
            .field("name", &self.name)
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

/// Decision on how a page's rating markup is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    /// Emit this document as a standalone block.
    Standalone(SchemaDocument),
    /// Emit nothing; the external component emits the merged rating.
    MergeIntoExternal(HandlerRegistration),
    /// Emit nothing at all.
    Suppressed,
}

impl RenderPlan {
    pub fn label(&self) -> &'static str {
        match self {
            RenderPlan::Standalone(_) => "standalone",
            RenderPlan::MergeIntoExternal(_) => "merge-into-external",
            RenderPlan::Suppressed => "suppressed",
        }
    }
}

/// Chooses between merging into external SEO output and emitting a
/// standalone document.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationDispatcher {
    capability: SeoCapability,
}

impl IntegrationDispatcher {
    pub fn new(capability: SeoCapability) -> Self {
        Self { capability }
    }

    pub fn capability(&self) -> SeoCapability {
        self.capability
    }

    /// Whether the merge path through the extension point applies.
    pub fn merges_into_external(&self, settings: &SchemaSettings) -> bool {
        settings.integration_enabled && self.capability.is_present()
    }

    /// Whether a stored third-party schema list should be consulted.
    pub fn wants_stored_schemas(&self, settings: &SchemaSettings) -> bool {
        settings.integration_enabled && !self.capability.is_present()
    }

    /// Produces the render plan for one content item.
    ///
    /// `stored` is the stored third-party list, if the caller looked it up.
    /// `build` is only invoked when the standalone builder path is taken.
    pub fn dispatch<F>(
        &self,
        ctx: &mut RequestContext,
        content_id: i64,
        fragment: &RatingFragment,
        stored: Option<Vec<Value>>,
        build: F,
    ) -> RenderPlan
    where
        F: FnOnce() -> Option<SchemaRecord>,
    {
        if self.merges_into_external(ctx.settings()) {
            let handler = Arc::new(RatingMergeHandler::new(fragment.clone()));
            let registration = ctx.extension_point_mut().register(content_id, handler);
            debug!(content_id, extension_point = %registration.extension_point, "Registered rating merge handler");
            return RenderPlan::MergeIntoExternal(registration);
        }

        if self.wants_stored_schemas(ctx.settings()) {
            if let Some(schemas) = stored.filter(|list| !list.is_empty()) {
                debug!(content_id, entries = schemas.len(), "Merging rating into stored schema list");
                return RenderPlan::Standalone(SchemaDocument::Graph(merge_rating(
                    schemas, fragment,
                )));
            }
        }

        match build() {
            Some(record) => RenderPlan::Standalone(SchemaDocument::Record(record)),
            None => RenderPlan::Suppressed,
        }
    }
}
