//! Mogwai Engine - Deterministic mogwai evolution from on-chain shift history
//!
//! The Engine is the backend server that:
//! - Keeps a local cache of block hashes in step with the node
//! - Rebuilds a mogwai's shift history from its burns and the cached hashes
//! - Replays that history into traits, levels and hit points
//! - Plays adventures and burns bindings and interactions through the node

mod application;
mod domain;
mod infrastructure;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::cache_worker::block_cache_worker;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mogwai_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mogwai Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Node: {}", config.rpc_url);
    tracing::info!("  Block store: {}", config.database_url);

    // Initialize application state
    let state = AppState::new(config).await?;
    let state = Arc::new(state);
    tracing::info!("Application state initialized");

    // Keep the block hash cache synced in the background
    let cache_worker = {
        let cache = state.block_cache.clone();
        let interval = Duration::from_secs(state.config.cache_sync_interval_secs.max(1));
        tokio::spawn(async move {
            block_cache_worker(cache, interval).await;
        })
    };

    let port = state.config.server_port;

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        // Merge REST API routes
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping workers...");
            cache_worker.abort();
            tracing::info!("Workers stopped");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
