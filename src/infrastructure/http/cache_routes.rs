//! Block hash cache API routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{
    BlockHashQueryDto, BlockHashesResponseDto, CacheStatsDto, SyncRequestDto, SyncResponseDto,
};
use crate::infrastructure::state::AppState;

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<CacheStatsDto>, (StatusCode, String)> {
    state
        .block_cache
        .stats()
        .await
        .map(|stats| Json(stats.into()))
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("{e:#}")))
}

/// Sync now; `?clear=true` drops the cache and starts from height zero
pub async fn sync_cache(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SyncRequestDto>,
) -> Result<Json<SyncResponseDto>, (StatusCode, String)> {
    let report = if request.clear {
        state.block_cache.resync().await
    } else {
        state.block_cache.sync().await
    };

    report
        .map(|r| Json(r.into()))
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("{e:#}")))
}

pub async fn find_block_hashes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlockHashQueryDto>,
) -> Result<Json<BlockHashesResponseDto>, (StatusCode, String)> {
    let hashes = state
        .block_cache
        .find_block_hashes(query.from, query.to, &query.pattern_list())
        .await
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;

    Ok(Json(BlockHashesResponseDto { hashes }))
}
