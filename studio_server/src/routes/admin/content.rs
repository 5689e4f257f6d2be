//! Portfolio, showcase and FAQ management.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::faq::{Faq, FaqForm};
use crate::models::media::{MediaForm, PortfolioItem, ShowcaseItem};
use crate::routes::extractors::{JsonBody, NumericId};
use crate::services::media_service::{self, MediaFilter};
use crate::services::faq_service;
use crate::state::AppState;

use super::deleted;

/// Admin listings include unpublished items.
#[derive(Debug, Default, Deserialize)]
pub struct AdminMediaQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    #[serde(default)]
    pub published_only: bool,
}

impl From<AdminMediaQuery> for MediaFilter {
    fn from(query: AdminMediaQuery) -> Self {
        MediaFilter {
            published_only: query.published_only,
            category: query.category.filter(|c| !c.trim().is_empty()),
            featured: query.featured,
        }
    }
}

// ── Portfolio ──

pub async fn list_portfolio(
    State(state): State<AppState>,
    Query(query): Query<AdminMediaQuery>,
) -> ApiResult<Json<Vec<PortfolioItem>>> {
    let mut conn = state.pool.get().await?;
    let filter = MediaFilter::from(query);
    Ok(Json(media_service::list_portfolio(&mut conn, &filter).await?))
}

pub async fn create_portfolio(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<MediaForm>,
) -> ApiResult<(StatusCode, Json<PortfolioItem>)> {
    let new_item = form.into_new_portfolio()?;
    let mut conn = state.pool.get().await?;
    let item = media_service::create_portfolio_item(&mut conn, new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    NumericId(item_id): NumericId,
    JsonBody(form): JsonBody<MediaForm>,
) -> ApiResult<Json<PortfolioItem>> {
    let changes = form.into_portfolio_changes()?;
    let mut conn = state.pool.get().await?;
    media_service::update_portfolio_item(&mut conn, item_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("portfolio item", item_id))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    NumericId(item_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = media_service::delete_portfolio_item(&mut conn, item_id).await?;
    deleted(found, "portfolio item", item_id)
}

// ── Showcase ──

pub async fn list_showcase(
    State(state): State<AppState>,
    Query(query): Query<AdminMediaQuery>,
) -> ApiResult<Json<Vec<ShowcaseItem>>> {
    let mut conn = state.pool.get().await?;
    let filter = MediaFilter::from(query);
    Ok(Json(media_service::list_showcase(&mut conn, &filter).await?))
}

pub async fn create_showcase(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<MediaForm>,
) -> ApiResult<(StatusCode, Json<ShowcaseItem>)> {
    let new_item = form.into_new_showcase()?;
    let mut conn = state.pool.get().await?;
    let item = media_service::create_showcase_item(&mut conn, new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_showcase(
    State(state): State<AppState>,
    NumericId(item_id): NumericId,
    JsonBody(form): JsonBody<MediaForm>,
) -> ApiResult<Json<ShowcaseItem>> {
    let changes = form.into_showcase_changes()?;
    let mut conn = state.pool.get().await?;
    media_service::update_showcase_item(&mut conn, item_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("showcase item", item_id))
}

pub async fn delete_showcase(
    State(state): State<AppState>,
    NumericId(item_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = media_service::delete_showcase_item(&mut conn, item_id).await?;
    deleted(found, "showcase item", item_id)
}

// ── FAQs ──

pub async fn list_faqs(State(state): State<AppState>) -> ApiResult<Json<Vec<Faq>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(faq_service::list_faqs(&mut conn, false).await?))
}

pub async fn create_faq(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<FaqForm>,
) -> ApiResult<(StatusCode, Json<Faq>)> {
    let new_faq = form.into_new()?;
    let mut conn = state.pool.get().await?;
    let faq = faq_service::create_faq(&mut conn, new_faq).await?;
    Ok((StatusCode::CREATED, Json(faq)))
}

pub async fn update_faq(
    State(state): State<AppState>,
    NumericId(faq_id): NumericId,
    JsonBody(form): JsonBody<FaqForm>,
) -> ApiResult<Json<Faq>> {
    let changes = form.into_changes()?;
    let mut conn = state.pool.get().await?;
    faq_service::update_faq(&mut conn, faq_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("faq", faq_id))
}

pub async fn delete_faq(
    State(state): State<AppState>,
    NumericId(faq_id): NumericId,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = faq_service::delete_faq(&mut conn, faq_id).await?;
    deleted(found, "faq", faq_id)
}
