//! Content repository: published content items, their terms and metadata.

use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crate::entities::{ContentItemEntity, ContentTermEntity};
use crate::metrics::QueryTimer;
use domain::models::ContentItem;
use domain::services::ContentSource;
use domain::StoreError;

use super::store_error;

/// Default metadata key of the schema list stored by the SEO component.
pub const DEFAULT_EXTERNAL_SCHEMA_META_KEY: &str = "slim_seo_schema";

/// Repository for content metadata.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
    external_schema_meta_key: String,
}

impl ContentRepository {
    /// Reads the stored external schema list from `meta_key`.
    pub fn with_meta_key(pool: PgPool, meta_key: impl Into<String>) -> Self {
        Self {
            pool,
            external_schema_meta_key: meta_key.into(),
        }
    }

    async fn find_terms(&self, content_id: i64) -> Result<Vec<ContentTermEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_content_terms");
        let result = sqlx::query_as::<_, ContentTermEntity>(
            r#"
            SELECT taxonomy, name
            FROM content_terms
            WHERE content_id = $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }
}

/// Reads a stored schema value as a list of entries.
fn schema_list(value: Value) -> Result<Vec<Value>, StoreError> {
    match value {
        Value::Array(entries) => Ok(entries),
        other => Err(StoreError::Decode(format!(
            "expected a schema list, found {other}"
        ))),
    }
}

#[async_trait::async_trait]
impl ContentSource for ContentRepository {
    async fn find_content(&self, content_id: i64) -> Result<Option<ContentItem>, StoreError> {
        let timer = QueryTimer::new("find_content");
        let result = sqlx::query_as::<_, ContentItemEntity>(
            r#"
            SELECT id, title, permalink, content_type, excerpt, thumbnail_url, published_at
            FROM content_items
            WHERE id = $1 AND status = 'publish'
            "#,
        )
        .bind(content_id)
        .fetch_optional(&self.pool)
        .await;
        let Some(entity) = timer.finish(result).map_err(store_error)? else {
            debug!(content_id, "Content not found");
            return Ok(None);
        };
        let terms = self.find_terms(content_id).await.map_err(store_error)?;
        Ok(Some(entity.into_domain(terms)))
    }

    async fn external_schemas(&self, content_id: i64) -> Result<Option<Vec<Value>>, StoreError> {
        let timer = QueryTimer::new("find_external_schemas");
        let result = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT meta_value
            FROM content_meta
            WHERE content_id = $1 AND meta_key = $2
            "#,
        )
        .bind(content_id)
        .bind(&self.external_schema_meta_key)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result).map_err(store_error)?.map(schema_list).transpose()
    }
}
