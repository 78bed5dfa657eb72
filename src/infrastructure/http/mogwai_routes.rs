//! Mogwai API routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{
    AdventureRequestDto, AdventureResponseDto, BurnResponseDto, FundsResponseDto, MogwaiQueryDto,
    MogwaiResponseDto, MogwaiSummaryDto,
};
use crate::application::services::BindingError;
use crate::domain::entities::AdventureAction;
use crate::domain::value_objects::MogwaiAddress;
use crate::infrastructure::state::AppState;

/// Bound state and the mogwai evolved to the requested height
pub async fn get_mogwai(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<MogwaiQueryDto>,
) -> Result<Json<MogwaiResponseDto>, (StatusCode, String)> {
    let address = parse_address(address)?;

    let lookup = state
        .mogwai_service
        .evolved_mogwai(&address, query.height)
        .await
        .map_err(internal_error)?;

    let (mogwai, evolve) = match lookup.evolved {
        Some((mogwai, report)) => (Some(MogwaiSummaryDto::from(&mogwai)), Some(report.into())),
        None => (None, None),
    };
    let response = MogwaiResponseDto {
        address: address.to_string(),
        bound_state: lookup.bound_state,
        mogwai,
        evolve,
    };
    Ok(Json(response))
}

pub async fn bind_mogwai(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<BurnResponseDto>, (StatusCode, String)> {
    let address = parse_address(address)?;

    let tx_id = state
        .mogwai_service
        .bind_mogwai(&address)
        .await
        .map_err(binding_error)?;
    Ok(Json(BurnResponseDto { tx_id }))
}

/// Play an adventure locally, optionally burning the interaction first
pub async fn run_adventure(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Json(request): Json<AdventureRequestDto>,
) -> Result<Json<AdventureResponseDto>, (StatusCode, String)> {
    let address = parse_address(address)?;
    let action = AdventureAction::new(request.adventure_type, request.difficulty, request.average_party_level)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let tx_id = if request.send {
        Some(
            state
                .mogwai_service
                .send_interaction(&address, &action)
                .await
                .map_err(binding_error)?,
        )
    } else {
        None
    };

    let run = state
        .mogwai_service
        .run_adventure(&address, action, request.height)
        .await
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No mogwai bound to {address}")))?;

    let mut response = AdventureResponseDto::from(run);
    response.tx_id = tx_id;
    Ok(Json(response))
}

pub async fn get_funds(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<FundsResponseDto>, (StatusCode, String)> {
    let address = parse_address(address)?;

    let spendable = state
        .mogwai_service
        .unspent_funds(&address)
        .await
        .map_err(internal_error)?;
    let pending = state
        .mogwai_service
        .unconfirmed_funds("", &[address.to_string()])
        .await
        .map_err(internal_error)?
        .remove(address.as_str())
        .unwrap_or_default();

    Ok(Json(FundsResponseDto {
        address: address.to_string(),
        spendable,
        unconfirmed: pending.unconfirmed,
        confirming: pending.confirming,
    }))
}

fn parse_address(address: String) -> Result<MogwaiAddress, (StatusCode, String)> {
    MogwaiAddress::parse(address).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

fn internal_error(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
}

fn binding_error(e: BindingError) -> (StatusCode, String) {
    let status = match &e {
        BindingError::NotBound => StatusCode::NOT_FOUND,
        BindingError::AlreadyBound | BindingError::PendingConfirmation => StatusCode::CONFLICT,
        BindingError::NoMirrorAddress(_) => StatusCode::BAD_REQUEST,
        BindingError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
        BindingError::SigningIncomplete | BindingError::Node(_) => StatusCode::BAD_GATEWAY,
        BindingError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
