//! HTTP REST API routes

mod adventure_routes;
mod cache_routes;
mod mogwai_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Mogwai routes
        .route("/api/mogwais/{address}", get(mogwai_routes::get_mogwai))
        .route("/api/mogwais/{address}/bind", post(mogwai_routes::bind_mogwai))
        .route(
            "/api/mogwais/{address}/adventure",
            post(mogwai_routes::run_adventure),
        )
        .route("/api/mogwais/{address}/funds", get(mogwai_routes::get_funds))
        // Block cache routes
        .route("/api/cache/stats", get(cache_routes::get_stats))
        .route("/api/cache/sync", post(cache_routes::sync_cache))
        .route("/api/cache/blocks", get(cache_routes::find_block_hashes))
        // Adventure routes
        .route(
            "/api/adventures/decode",
            get(adventure_routes::decode_action),
        )
}
