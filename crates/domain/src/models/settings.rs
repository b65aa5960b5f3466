//! Schema output settings.
//!
//! Admin-managed configuration read by the schema builder and the
//! integration dispatcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Content types that get schema output when no mapping table exists.
pub const DEFAULT_ENABLED_TYPES: [&str; 1] = ["post"];

/// Persisted schema settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaSettings {
    /// Legacy list of enabled content types, consulted only while
    /// `type_mappings` is empty.
    pub enabled_types: Vec<String>,
    /// Content type to schema type. An empty schema type means ratings-only.
    pub type_mappings: BTreeMap<String, String>,
    /// Author organization for creative works. Falls back to the site name.
    pub organization_name: Option<String>,
    /// Whether ratings are merged into third-party SEO schema output.
    pub integration_enabled: bool,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            enabled_types: DEFAULT_ENABLED_TYPES.iter().map(|s| s.to_string()).collect(),
            type_mappings: BTreeMap::new(),
            organization_name: None,
            integration_enabled: true,
        }
    }
}

impl SchemaSettings {
    /// Schema type configured for a content type, `""` for ratings-only.
    pub fn schema_type_for(&self, content_type: &str) -> &str {
        self.type_mappings
            .get(content_type)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether the mapping table is empty and the legacy list applies.
    pub fn uses_legacy_types(&self) -> bool {
        self.type_mappings.is_empty()
    }

    /// Whether page output is enabled for a content type.
    pub fn is_output_enabled_for(&self, content_type: &str) -> bool {
        if self.uses_legacy_types() {
            self.enabled_types.iter().any(|t| t == content_type)
        } else {
            self.type_mappings.contains_key(content_type)
        }
    }

    /// Organization name with the site name as fallback.
    pub fn organization_name_or(&self, site_name: &str) -> String {
        match self.organization_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => site_name.to_string(),
        }
    }
}

/// PUT request for the settings form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSchemaSettingsRequest {
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_identifier_list"))]
    pub enabled_types: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_type_mappings"))]
    pub type_mappings: BTreeMap<String, String>,

    #[validate(length(max = 200, message = "Organization name must be at most 200 characters"))]
    pub organization_name: Option<String>,

    /// Unchecked checkboxes are not submitted, so absence means `false`.
    #[serde(default)]
    pub integration_enabled: Option<bool>,
}

impl UpdateSchemaSettingsRequest {
    /// Trims every value and drops blank entries.
    pub fn sanitize(self) -> SchemaSettings {
        let enabled_types = self
            .enabled_types
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let type_mappings = self
            .type_mappings
            .iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        let organization_name = self
            .organization_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        SchemaSettings {
            enabled_types,
            type_mappings,
            organization_name,
            integration_enabled: self.integration_enabled.unwrap_or(false),
        }
    }
}

/// GET/PUT response for the settings form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaSettingsResponse {
    pub enabled_types: Vec<String>,
    pub type_mappings: BTreeMap<String, String>,
    pub organization_name: Option<String>,
    /// Organization name actually used in output.
    pub effective_organization_name: String,
    pub integration_enabled: bool,
    /// True while the mapping table is empty.
    pub legacy_mode: bool,
    /// Whether a third-party SEO subsystem was detected at startup.
    pub external_seo_present: bool,
}

impl SchemaSettingsResponse {
    pub fn new(settings: SchemaSettings, site_name: &str, external_seo_present: bool) -> Self {
        Self {
            effective_organization_name: settings.organization_name_or(site_name),
            legacy_mode: settings.uses_legacy_types(),
            enabled_types: settings.enabled_types,
            type_mappings: settings.type_mappings,
            organization_name: settings.organization_name,
            integration_enabled: settings.integration_enabled,
            external_seo_present,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped() -> SchemaSettings {
        let mut settings = SchemaSettings::default();
        settings
            .type_mappings
            .insert("anime".to_string(), "TVSeries".to_string());
        settings.type_mappings.insert("page".to_string(), String::new());
        settings
    }

    #[test]
    fn test_defaults() {
        let settings = SchemaSettings::default();
        assert_eq!(settings.enabled_types, vec!["post"]);
        assert!(settings.type_mappings.is_empty());
        assert!(settings.integration_enabled);
        assert!(settings.organization_name.is_none());
    }

    #[test]
    fn test_schema_type_for_unmapped_is_ratings_only() {
        let settings = mapped();
        assert_eq!(settings.schema_type_for("anime"), "TVSeries");
        assert_eq!(settings.schema_type_for("page"), "");
        assert_eq!(settings.schema_type_for("movie"), "");
    }

    #[test]
    fn test_output_gate_legacy_list() {
        let settings = SchemaSettings::default();
        assert!(settings.uses_legacy_types());
        assert!(settings.is_output_enabled_for("post"));
        assert!(!settings.is_output_enabled_for("page"));
    }

    #[test]
    fn test_output_gate_mapping_table() {
        let settings = mapped();
        assert!(!settings.uses_legacy_types());
        assert!(settings.is_output_enabled_for("anime"));
        assert!(settings.is_output_enabled_for("page"));
        // Legacy list is ignored once a mapping table exists.
        assert!(!settings.is_output_enabled_for("post"));
    }

    #[test]
    fn test_organization_name_fallback() {
        let mut settings = SchemaSettings::default();
        assert_eq!(settings.organization_name_or("Anime DB"), "Anime DB");
        settings.organization_name = Some("  ".to_string());
        assert_eq!(settings.organization_name_or("Anime DB"), "Anime DB");
        settings.organization_name = Some("Otaku Hub".to_string());
        assert_eq!(settings.organization_name_or("Anime DB"), "Otaku Hub");
    }

    #[test]
    fn test_update_request_sanitize() {
        let json = r#"{
            "enabled_types": [" post ", ""],
            "type_mappings": {" anime ": " TVSeries ", "page": ""},
            "organization_name": "  Otaku Hub  "
        }"#;
        let request: UpdateSchemaSettingsRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());

        let settings = request.sanitize();
        assert_eq!(settings.enabled_types, vec!["post"]);
        assert_eq!(settings.type_mappings.get("anime").unwrap(), "TVSeries");
        assert_eq!(settings.type_mappings.get("page").unwrap(), "");
        assert_eq!(settings.organization_name.as_deref(), Some("Otaku Hub"));
        // Missing checkbox means disabled.
        assert!(!settings.integration_enabled);
    }

    #[test]
    fn test_update_request_validation_rejects_bad_schema_type() {
        let json = r#"{"type_mappings": {"manga": "Book (Manga)"}}"#;
        let request: UpdateSchemaSettingsRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_validation_rejects_long_name() {
        let request = UpdateSchemaSettingsRequest {
            enabled_types: vec![],
            type_mappings: BTreeMap::new(),
            organization_name: Some("x".repeat(201)),
            integration_enabled: Some(true),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_reports_effective_name() {
        let response = SchemaSettingsResponse::new(mapped(), "Anime DB", true);
        assert_eq!(response.effective_organization_name, "Anime DB");
        assert!(!response.legacy_mode);
        assert!(response.external_seo_present);
    }
}
