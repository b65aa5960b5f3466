//! Schema settings repository (singleton row).

use sqlx::types::Json;
use sqlx::PgPool;

use crate::entities::SchemaSettingsEntity;
use crate::metrics::QueryTimer;
use domain::models::SchemaSettings;
use domain::services::SettingsStore;
use domain::StoreError;

use super::store_error;

/// Repository for the admin-managed schema settings.
#[derive(Clone)]
pub struct SchemaSettingsRepository {
    pool: PgPool,
}

impl SchemaSettingsRepository {
    /// Creates a new SchemaSettingsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SettingsStore for SchemaSettingsRepository {
    async fn load(&self) -> Result<SchemaSettings, StoreError> {
        let timer = QueryTimer::new("load_schema_settings");
        let result = sqlx::query_as::<_, SchemaSettingsEntity>(
            r#"
            SELECT enabled_types, type_mappings, organization_name, integration_enabled, updated_at
            FROM schema_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        Ok(timer
            .finish(result)
            .map_err(store_error)?
            .map(Into::into)
            .unwrap_or_default())
    }

    async fn save(&self, settings: SchemaSettings) -> Result<SchemaSettings, StoreError> {
        let timer = QueryTimer::new("save_schema_settings");
        let result = sqlx::query_as::<_, SchemaSettingsEntity>(
            r#"
            INSERT INTO schema_settings (id, enabled_types, type_mappings, organization_name, integration_enabled)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET enabled_types = $1, type_mappings = $2, organization_name = $3,
                          integration_enabled = $4, updated_at = NOW()
            RETURNING enabled_types, type_mappings, organization_name, integration_enabled, updated_at
            "#,
        )
        .bind(&settings.enabled_types)
        .bind(Json(&settings.type_mappings))
        .bind(&settings.organization_name)
        .bind(settings.integration_enabled)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result).map(Into::into).map_err(store_error)
    }
}
