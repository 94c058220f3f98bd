//! Choral Marketplace server entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use choral_marketplace::adapters::http::{app_router, MarketplaceAppState};
use choral_marketplace::adapters::postgres::{
    self, PostgresCompositionCatalog, PostgresPopularityStats, PostgresPreferenceStore,
    PostgresPurchaseLedger,
};
use choral_marketplace::application::RecommendationSettings;
use choral_marketplace::config::{AppConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);
    config.validate().context("Invalid configuration")?;

    info!(
        environment = ?config.server.environment,
        database = %config.database.redacted_url(),
        "Starting Choral Marketplace"
    );

    let pool = postgres::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
    }

    let state = MarketplaceAppState {
        catalog: Arc::new(PostgresCompositionCatalog::new(pool.clone())),
        preferences: Arc::new(PostgresPreferenceStore::new(pool.clone())),
        stats: Arc::new(PostgresPopularityStats::new(pool.clone())),
        ledger: Arc::new(PostgresPurchaseLedger::new(pool.clone())),
        settings: RecommendationSettings::from(&config.recommendation),
    };
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.effective_log_format() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
