use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod catalog;
mod config;
mod domain;
mod error;
mod metrics;
mod models;
mod service;
mod store;

use catalog::HttpProductCatalog;
use config::{AppConfig, StoreBackend};
use service::OrderService;
use store::{InMemoryOrderStore, OrderStore, PgOrderStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    // Default to INFO, overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,orders_ms=debug")),
        )
        .init();

    tracing::info!("Starting orders microservice");

    // === 1. Configuration ===
    let config = AppConfig::load()?;
    let statuses = config.statuses()?;
    tracing::info!(
        port = config.port,
        store_backend = ?config.store_backend,
        products_service_url = %config.products_service_url,
        statuses = %statuses.describe(),
        "Configuration loaded"
    );

    // === 2. Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!(
        "Metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    // === 3. Order store ===
    let store: Arc<dyn OrderStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(config::ConfigError::MissingDatabaseUrl)?;

            tracing::info!("Connecting to Postgres...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await?;

            let store = PgOrderStore::new(pool);
            store.ensure_schema(&statuses).await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory order store, data is lost on restart");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    // === 4. Products service client ===
    let catalog = Arc::new(HttpProductCatalog::new(
        &config.products_service_url,
        config.products_timeout(),
    )?);

    // === 5. HTTP server ===
    let service = web::Data::new(OrderService::new(
        store,
        catalog,
        statuses,
        metrics.clone(),
    ));
    let metrics_data = web::Data::from(metrics);

    tracing::info!("Orders microservice running on port {}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(metrics_data.clone())
            .configure(api::configure)
            .configure(metrics::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    tracing::info!("Orders microservice stopped");
    Ok(())
}
