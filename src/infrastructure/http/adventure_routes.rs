//! Adventure API routes

use axum::{extract::Query, http::StatusCode, Json};

use crate::application::dto::{AdventureActionDto, DecodeQueryDto};
use crate::domain::entities::AdventureAction;

/// Decode the two packed values of an on-chain interaction
pub async fn decode_action(
    Query(query): Query<DecodeQueryDto>,
) -> Result<Json<AdventureActionDto>, (StatusCode, String)> {
    AdventureAction::from_packed(query.param1, query.param2)
        .map(|action| Json(action.into()))
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}
