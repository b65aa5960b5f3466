//! Schema settings entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Database row mapping for the singleton schema_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct SchemaSettingsEntity {
    pub enabled_types: Vec<String>,
    pub type_mappings: Json<BTreeMap<String, String>>,
    pub organization_name: Option<String>,
    pub integration_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<SchemaSettingsEntity> for domain::models::SchemaSettings {
    fn from(entity: SchemaSettingsEntity) -> Self {
        Self {
            enabled_types: entity.enabled_types,
            type_mappings: entity.type_mappings.0,
            organization_name: entity.organization_name,
            integration_enabled: entity.integration_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::SchemaSettings;

    #[test]
    fn test_entity_to_domain() {
        let mut mappings = BTreeMap::new();
        mappings.insert("anime".to_string(), "Movie".to_string());
        let entity = SchemaSettingsEntity {
            enabled_types: vec!["post".to_string()],
            type_mappings: Json(mappings),
            organization_name: Some("Studio".to_string()),
            integration_enabled: false,
            updated_at: Utc::now(),
        };

        let settings: SchemaSettings = entity.into();
        assert_eq!(settings.schema_type_for("anime"), "Movie");
        assert_eq!(settings.organization_name.as_deref(), Some("Studio"));
        assert!(!settings.integration_enabled);
    }
}
