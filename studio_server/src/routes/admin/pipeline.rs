//! Kanban board endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::error::{ApiError, ApiResult};
use crate::models::pipeline::{CardForm, MoveCardRequest, PipelineCard, PipelineStage};
use crate::routes::extractors::{JsonBody, NumericId};
use crate::services::pipeline_service::{self, Advance, BoardColumn};
use crate::state::AppState;

use super::deleted;

pub async fn board(State(state): State<AppState>) -> ApiResult<Json<Vec<BoardColumn>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(pipeline_service::board(&mut conn).await?))
}

pub async fn get_card(
    State(state): State<AppState>,
    NumericId(card_id): NumericId,
) -> ApiResult<Json<PipelineCard>> {
    let mut conn = state.pool.get().await?;
    pipeline_service::get_card(&mut conn, card_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("card", card_id))
}

pub async fn create_card(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<CardForm>,
) -> ApiResult<(StatusCode, Json<PipelineCard>)> {
    let new_card = form.into_new()?;
    let mut conn = state.pool.get().await?;
    let card = pipeline_service::create_card(&mut conn, new_card).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn update_card(
    State(state): State<AppState>,
    NumericId(card_id): NumericId,
    JsonBody(form): JsonBody<CardForm>,
) -> ApiResult<Json<PipelineCard>> {
    let changes = form.into_changes()?;
    let mut conn = state.pool.get().await?;
    pipeline_service::update_card(&mut conn, card_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("card", card_id))
}

/// Drag to any column; stage names are case-insensitive.
pub async fn move_card(
    State(state): State<AppState>,
    NumericId(card_id): NumericId,
    JsonBody(req): JsonBody<MoveCardRequest>,
) -> ApiResult<Json<PipelineCard>> {
    let stage: PipelineStage = req.status.parse()?;
    let mut conn = state.pool.get().await?;
    pipeline_service::move_card(&mut conn, card_id, stage, req.position)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("card", card_id))
}

pub async fn advance_card(
    State(state): State<AppState>,
    NumericId(card_id): NumericId,
) -> ApiResult<Json<PipelineCard>> {
    let mut conn = state.pool.get().await?;
    match pipeline_service::advance_card(&mut conn, card_id).await? {
        Advance::Moved(card) => Ok(Json(card)),
        Advance::AlreadyDelivered => Err(ApiError::BadRequest(format!(
            "card {card_id} is already delivered"
        ))),
        Advance::Missing => Err(ApiError::not_found("card", card_id)),
    }
}

pub async fn delete_card(
    State(state): State<AppState>,
    NumericId(card_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = pipeline_service::delete_card(&mut conn, card_id).await?;
    if found {
        tracing::info!(card_id, "Pipeline card deleted");
    }
    deleted(found, "card", card_id)
}
