use domain::services::{CacheTtl, PipelineOptions, SeoCapability, DEFAULT_EXTENSION_POINT};
use persistence::db::DatabaseConfig;
use persistence::repositories::DEFAULT_EXTERNAL_SCHEMA_META_KEY;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default = "default_database")]
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// SHA-256 hex digest of the admin API key. Empty rejects all admin calls.
    #[serde(default)]
    pub admin_api_key_hash: String,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Aggregate cache policy.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_positive_ttl")]
    pub positive_ttl_secs: u64,

    #[serde(default = "default_negative_ttl")]
    pub negative_ttl_secs: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            positive_ttl_secs: default_positive_ttl(),
            negative_ttl_secs: default_negative_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Fallback organization name for creative works.
    #[serde(default)]
    pub name: String,
}

/// Third-party SEO integration.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationConfig {
    /// Whether the external SEO component is installed and active.
    #[serde(default)]
    pub external_seo_present: bool,

    #[serde(default = "default_extension_point")]
    pub extension_point: String,

    /// Content metadata key holding the component's stored schema list.
    #[serde(default = "default_external_schema_meta_key")]
    pub external_schema_meta_key: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            external_seo_present: false,
            extension_point: default_extension_point(),
            external_schema_meta_key: default_external_schema_meta_key(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_positive_ttl() -> u64 {
    300
}
fn default_negative_ttl() -> u64 {
    60
}
fn default_max_entries() -> u64 {
    10_000
}
fn default_extension_point() -> String {
    DEFAULT_EXTENSION_POINT.to_string()
}
fn default_external_schema_meta_key() -> String {
    DEFAULT_EXTERNAL_SCHEMA_META_KEY.to_string()
}
fn default_database() -> DatabaseConfig {
    DatabaseConfig {
        url: String::new(),
        max_connections: 10,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 600,
    }
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with RS__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RS").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides, without
    /// touching config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            admin_api_key_hash = ""
            cors_origins = []

            [cache]
            positive_ttl_secs = 300
            negative_ttl_secs = 60
            max_entries = 10000

            [site]
            name = "Test Site"

            [integration]
            external_seo_present = false
            extension_point = "slim_seo_schema_output"
            external_schema_meta_key = "slim_seo_schema"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.cache.positive_ttl_secs == 0 || self.cache.negative_ttl_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "cache TTLs must be greater than 0".to_string(),
            ));
        }

        if self.integration.extension_point.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "integration.extension_point must not be empty".to_string(),
            ));
        }

        if self.integration.external_schema_meta_key.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "integration.external_schema_meta_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        CacheTtl {
            positive: Duration::from_secs(self.cache.positive_ttl_secs),
            negative: Duration::from_secs(self.cache.negative_ttl_secs),
        }
    }

    /// Startup options for the rating schema pipeline.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            site_name: self.site.name.clone(),
            ttl: self.cache_ttl(),
            capability: SeoCapability::from_flag(self.integration.external_seo_present),
            extension_point: self.integration.extension_point.clone(),
        }
    }
}
