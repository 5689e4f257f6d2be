//! Packages, events and the order ledger.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::event::{Event, EventForm};
use crate::models::order::Order;
use crate::models::package::{Package, PackageForm};
use crate::routes::extractors::{JsonBody, NumericId};
use crate::services::{catalog_service, order_service};
use crate::state::AppState;

use super::deleted;

// ── Packages ──

pub async fn list_packages(State(state): State<AppState>) -> ApiResult<Json<Vec<Package>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(catalog_service::list_packages(&mut conn, false).await?))
}

pub async fn get_package(
    State(state): State<AppState>,
    NumericId(package_id): NumericId,
) -> ApiResult<Json<Package>> {
    let mut conn = state.pool.get().await?;
    catalog_service::get_package(&mut conn, package_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("package", package_id))
}

pub async fn create_package(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<PackageForm>,
) -> ApiResult<(StatusCode, Json<Package>)> {
    let new_package = form.into_new()?;
    let mut conn = state.pool.get().await?;
    let package = catalog_service::create_package(&mut conn, new_package).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

pub async fn update_package(
    State(state): State<AppState>,
    NumericId(package_id): NumericId,
    JsonBody(form): JsonBody<PackageForm>,
) -> ApiResult<Json<Package>> {
    let changes = form.into_changes()?;
    let mut conn = state.pool.get().await?;
    catalog_service::update_package(&mut conn, package_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("package", package_id))
}

pub async fn delete_package(
    State(state): State<AppState>,
    NumericId(package_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = catalog_service::delete_package(&mut conn, package_id).await?;
    deleted(found, "package", package_id)
}

// ── Events ──

pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(catalog_service::list_events(&mut conn).await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    NumericId(event_id): NumericId,
) -> ApiResult<Json<Event>> {
    let mut conn = state.pool.get().await?;
    catalog_service::get_event(&mut conn, event_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("event", event_id))
}

pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<EventForm>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let new_event = form.into_new()?;
    let mut conn = state.pool.get().await?;
    let event = catalog_service::create_event(&mut conn, new_event).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    NumericId(event_id): NumericId,
    JsonBody(form): JsonBody<EventForm>,
) -> ApiResult<Json<Event>> {
    let changes = form.into_changes()?;
    let mut conn = state.pool.get().await?;
    catalog_service::update_event(&mut conn, event_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("event", event_id))
}

pub async fn delete_event(
    State(state): State<AppState>,
    NumericId(event_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = catalog_service::delete_event(&mut conn, event_id).await?;
    deleted(found, "event", event_id)
}

// ── Orders ──

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub limit: Option<i64>,
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let mut conn = state.pool.get().await?;
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    Ok(Json(order_service::list_orders(&mut conn, limit).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    NumericId(order_id): NumericId,
) -> ApiResult<Json<Order>> {
    let mut conn = state.pool.get().await?;
    order_service::get_order(&mut conn, order_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("order", order_id))
}
