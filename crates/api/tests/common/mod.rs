//! Common test utilities for integration tests.
//!
//! Builds the router over in-memory collaborators; no database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::{TimeZone, Utc};
use domain::models::{ContentItem, SchemaSettings, TaxonomyTerm};
use domain::services::{
    InMemoryContentSource, InMemoryReviewStore, InMemorySettingsStore, RatingSchemaService,
};
use persistence::db::DatabaseConfig;
use rating_schema_api::app::{build_service, create_app, Collaborators};
use rating_schema_api::config::{
    CacheConfig, Config, IntegrationConfig, LoggingConfig, SecurityConfig, ServerConfig,
    SiteConfig,
};
use std::sync::Arc;

/// Raw admin key accepted by [`test_config`].
pub const TEST_ADMIN_KEY: &str = "rs_admin_test_key";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            admin_api_key_hash: shared::crypto::sha256_hex(TEST_ADMIN_KEY),
            cors_origins: vec![],
        },
        cache: CacheConfig {
            positive_ttl_secs: 300,
            negative_ttl_secs: 60,
            max_entries: 1000,
        },
        site: SiteConfig {
            name: "Example Site".to_string(),
        },
        integration: IntegrationConfig {
            external_seo_present: false,
            extension_point: "slim_seo_schema_output".to_string(),
            external_schema_meta_key: "slim_seo_schema".to_string(),
        },
    }
}

/// Settings with the given content type to schema type mappings.
pub fn mapped_settings(pairs: &[(&str, &str)]) -> SchemaSettings {
    SchemaSettings {
        type_mappings: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..SchemaSettings::default()
    }
}

/// A running service over in-memory collaborators.
pub struct TestEnv {
    pub config: Config,
    pub reviews: Arc<InMemoryReviewStore>,
    pub content: Arc<InMemoryContentSource>,
    pub settings: Arc<InMemorySettingsStore>,
    pub service: Arc<RatingSchemaService>,
}

impl TestEnv {
    pub fn new(settings: SchemaSettings) -> Self {
        Self::build(test_config(), settings, InMemoryReviewStore::new())
    }

    pub fn build(config: Config, settings: SchemaSettings, reviews: InMemoryReviewStore) -> Self {
        let reviews = Arc::new(reviews);
        let content = Arc::new(InMemoryContentSource::new());
        let settings = Arc::new(InMemorySettingsStore::new(settings));
        let service = build_service(
            &config,
            Collaborators::in_memory(reviews.clone(), content.clone(), settings.clone()),
        );
        Self {
            config,
            reviews,
            content,
            settings,
            service,
        }
    }

    pub fn app(&self) -> Router {
        create_app(self.config.clone(), self.service.clone())
    }

    pub fn add_content(&self, id: i64, content_type: &str, title: &str) {
        self.content.insert(ContentItem {
            id,
            title: title.to_string(),
            permalink: format!("https://example.com/{content_type}/{id}"),
            content_type: content_type.to_string(),
            excerpt: Some("<p>A <em>fine</em> story.</p>".to_string()),
            thumbnail_url: Some(format!("https://example.com/img/{id}.jpg")),
            published_at: Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap(),
            terms: vec![
                TaxonomyTerm::new("genre", "Drama"),
                TaxonomyTerm::new("genre", "Mystery"),
            ],
        });
    }

    pub async fn add_reviews(&self, content_id: i64, ratings: &[f64]) {
        for rating in ratings {
            self.reviews.add_review(content_id, *rating, true).await;
        }
    }
}

pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// The JSON document inside a rendered schema block.
pub fn embedded_json(markup: &str) -> serde_json::Value {
    let start = markup
        .find("<script type=\"application/ld+json\">")
        .expect("script open tag")
        + "<script type=\"application/ld+json\">".len();
    let end = markup.find("</script>").expect("script close tag");
    serde_json::from_str(markup[start..end].trim()).expect("valid JSON-LD")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request_with_api_key(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("X-API-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request_with_api_key(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("X-API-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request_with_api_key(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    api_key: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-API-Key", api_key)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}
