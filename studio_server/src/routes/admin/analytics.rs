//! Dashboard overview and analytics endpoints.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::dashboard::analytics::{
    self, CardsByStage, DownloadsByDay, OrdersByPackage, Overview, RevenueByMonth, RevenueSummary,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<i32>,
}

pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Overview>> {
    let mut conn = state.pool.get().await?;
    let days = analytics::clamp_days(query.days);
    Ok(Json(analytics::query_overview(&mut conn, days).await?))
}

pub async fn revenue_summary(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<RevenueSummary>> {
    let mut conn = state.pool.get().await?;
    let days = analytics::clamp_days(query.days);
    Ok(Json(analytics::query_revenue_summary(&mut conn, days).await?))
}

pub async fn revenue_by_month(
    State(state): State<AppState>,
    Query(query): Query<MonthsQuery>,
) -> ApiResult<Json<Vec<RevenueByMonth>>> {
    let mut conn = state.pool.get().await?;
    let months = query.months.unwrap_or(12).clamp(1, 36);
    Ok(Json(analytics::query_revenue_by_month(&mut conn, months).await?))
}

pub async fn orders_by_package(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Vec<OrdersByPackage>>> {
    let mut conn = state.pool.get().await?;
    let days = analytics::clamp_days(query.days);
    Ok(Json(analytics::query_orders_by_package(&mut conn, days).await?))
}

pub async fn cards_by_stage(State(state): State<AppState>) -> ApiResult<Json<Vec<CardsByStage>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(analytics::query_cards_by_stage(&mut conn).await?))
}

pub async fn downloads_by_day(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Vec<DownloadsByDay>>> {
    let mut conn = state.pool.get().await?;
    let days = analytics::clamp_days(query.days);
    Ok(Json(analytics::query_downloads_by_day(&mut conn, days).await?))
}
