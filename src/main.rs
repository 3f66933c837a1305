//! rental-listings server entry point.
//!
//! Starts the Axum HTTP server backed by PostgreSQL or, when persistence is
//! disabled, by an in-memory store.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rental_listings::api;
use rental_listings::app_state::AppState;
use rental_listings::config::{ListingsConfig, LogFormat};
use rental_listings::persistence::{ListingStore, MemoryListingStore, PostgresListingStore};
use rental_listings::service::ListingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ListingsConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting rental-listings");

    // Build persistence layer
    let store = build_store(&config).await?;

    // Build service layer and application state
    let app_state = AppState {
        listing_service: Arc::new(ListingService::new(store)),
        cookie_secure: config.cookie_secure,
    };

    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &ListingsConfig) -> anyhow::Result<Arc<dyn ListingStore>> {
    if !config.persistence_enabled {
        let store = match &config.seed_file {
            Some(path) => MemoryListingStore::from_seed_file(path)
                .await
                .context("cannot load seed listings")?,
            None => MemoryListingStore::default(),
        };
        tracing::warn!("persistence disabled, serving listings from memory");
        return Ok(Arc::new(store));
    }

    let store = PostgresListingStore::connect(config)
        .await
        .context("cannot connect to the listings database")?;
    if config.database_run_migrations {
        store.migrate().await.context("migrations failed")?;
        tracing::info!("database migrations applied");
    }
    Ok(Arc::new(store))
}
