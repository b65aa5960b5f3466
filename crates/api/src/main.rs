use anyhow::{Context, Result};
use domain::models::SchemaSettings;
use domain::services::{InMemoryContentSource, InMemoryReviewStore, InMemorySettingsStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use rating_schema_api::app::{build_service, create_app, Collaborators};
use rating_schema_api::config::Config;
use rating_schema_api::jobs::{JobScheduler, PoolMetricsJob, StoreProbeJob};
use rating_schema_api::middleware::{init_metrics, logging::init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;

    init_logging(&config.logging).context("failed to initialize logging")?;
    init_metrics().context("failed to install Prometheus recorder")?;

    info!("Starting rating schema service v{}", env!("CARGO_PKG_VERSION"));

    let mut scheduler = JobScheduler::new();

    let collaborators = if config.database.is_configured() {
        let pool = persistence::db::create_pool(&config.database)
            .await
            .context("failed to connect to database")?;

        info!("Running database migrations...");
        persistence::db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
        info!("Migrations completed");

        scheduler.register(PoolMetricsJob::new(pool.clone()));
        Collaborators::postgres(pool, &config.integration.external_schema_meta_key)
    } else {
        warn!("No database configured, serving from in-memory collaborators");
        Collaborators::in_memory(
            Arc::new(InMemoryReviewStore::new()),
            Arc::new(InMemoryContentSource::new()),
            Arc::new(InMemorySettingsStore::new(SchemaSettings::default())),
        )
    };

    let service = build_service(&config, collaborators);
    scheduler.register(StoreProbeJob::new(service.clone()));
    scheduler.start();

    let addr = config.socket_addr().context("invalid server address")?;
    let app = create_app(config, service);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(5)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
