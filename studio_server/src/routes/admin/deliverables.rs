//! Deliverable management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::deliverable::{Deliverable, DeliverableForm, DownloadLog};
use crate::routes::extractors::{JsonBody, NumericId};
use crate::services::delivery_service;
use crate::state::AppState;

use super::deleted;

const RECENT_DOWNLOADS: i64 = 20;

#[derive(Debug, Serialize)]
pub struct DeliverableDetail {
    #[serde(flatten)]
    pub deliverable: Deliverable,
    pub recent_downloads: Vec<DownloadLog>,
}

pub async fn list_deliverables(State(state): State<AppState>) -> ApiResult<Json<Vec<Deliverable>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(delivery_service::list_deliverables(&mut conn).await?))
}

pub async fn get_deliverable(
    State(state): State<AppState>,
    NumericId(deliverable_id): NumericId,
) -> ApiResult<Json<DeliverableDetail>> {
    let mut conn = state.pool.get().await?;
    let deliverable = delivery_service::get_deliverable(&mut conn, deliverable_id)
        .await?
        .ok_or_else(|| ApiError::not_found("deliverable", deliverable_id))?;
    let recent_downloads =
        delivery_service::recent_downloads(&mut conn, deliverable_id, RECENT_DOWNLOADS).await?;
    Ok(Json(DeliverableDetail {
        deliverable,
        recent_downloads,
    }))
}

pub async fn create_deliverable(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<DeliverableForm>,
) -> ApiResult<(StatusCode, Json<Deliverable>)> {
    let new_deliverable = form.into_new()?;
    let mut conn = state.pool.get().await?;
    let deliverable = delivery_service::create_deliverable(&mut conn, new_deliverable).await?;
    Ok((StatusCode::CREATED, Json(deliverable)))
}

pub async fn update_deliverable(
    State(state): State<AppState>,
    NumericId(deliverable_id): NumericId,
    JsonBody(form): JsonBody<DeliverableForm>,
) -> ApiResult<Json<Deliverable>> {
    let changes = form.into_changes()?;
    let mut conn = state.pool.get().await?;
    delivery_service::update_deliverable(&mut conn, deliverable_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("deliverable", deliverable_id))
}

pub async fn delete_deliverable(
    State(state): State<AppState>,
    NumericId(deliverable_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = delivery_service::delete_deliverable(&mut conn, deliverable_id).await?;
    deleted(found, "deliverable", deliverable_id)
}
