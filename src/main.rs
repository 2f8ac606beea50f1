//! Usage Analytics API - Binary Entry Point
//!
//! Loads the dataset once, then serves the query engine over HTTP.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use usage_analytics::api::{create_router, AppState};
use usage_analytics::config::Config;
use usage_analytics::event_store::EventStore;
use usage_analytics::query::QueryEngine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let data_path = config.resolved_data_path();

    let mut store = EventStore::new(&data_path);
    let report = store
        .load()
        .with_context(|| format!("failed to load dataset from {}", data_path.display()))?;
    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        "dataset ready"
    );

    let engine = QueryEngine::new(store);
    if engine.stats().is_empty() {
        warn!("dataset contains no events; every query will return empty results");
    }

    let state = AppState::new(engine).with_strict_dates(config.strict_dates);
    let app = create_router(Arc::new(state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
