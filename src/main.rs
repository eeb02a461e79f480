use anyhow::Context;
use tracing_subscriber::EnvFilter;

use hotel_reservation::config::{AppConfig, StoreBackend};
use hotel_reservation::database::Store;
use hotel_reservation::server;
use hotel_reservation::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hotel_reservation=debug,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting hotel reservation API in {:?} mode", config.environment);
    if config.is_production() && config.database.backend == StoreBackend::Memory {
        tracing::warn!("Production profile is running on the in-memory store");
    }

    let store = Store::connect(&config.database)
        .await
        .context("failed to connect to the store")?;
    let state = AppState::new(config, store.clone()).context("failed to initialize auth services")?;

    server::serve(state, shutdown_signal()).await.context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
