//! Public read API consumed by the marketing site.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::event::Event;
use crate::models::faq::Faq;
use crate::models::legal::{LegalDocType, LegalPage};
use crate::models::media::{PortfolioItem, ShowcaseItem};
use crate::models::package::Package;
use crate::services::media_service::MediaFilter;
use crate::services::{catalog_service, faq_service, legal_service, media_service, settings_service};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl MediaQuery {
    fn published(self) -> MediaFilter {
        MediaFilter {
            published_only: true,
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            featured: self.featured,
        }
    }
}

pub async fn packages(State(state): State<AppState>) -> ApiResult<Json<Vec<Package>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(catalog_service::list_packages(&mut conn, true).await?))
}

pub async fn events(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    let mut conn = state.pool.get().await?;
    let today = Utc::now().date_naive();
    Ok(Json(catalog_service::list_upcoming_events(&mut conn, today).await?))
}

pub async fn portfolio(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> ApiResult<Json<Vec<PortfolioItem>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(media_service::list_portfolio(&mut conn, &query.published()).await?))
}

pub async fn showcase(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> ApiResult<Json<Vec<ShowcaseItem>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(media_service::list_showcase(&mut conn, &query.published()).await?))
}

pub async fn faqs(State(state): State<AppState>) -> ApiResult<Json<Vec<Faq>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(faq_service::list_faqs(&mut conn, true).await?))
}

/// Site settings. Never fails: without a database the defaults are served.
pub async fn settings(State(state): State<AppState>) -> Json<BTreeMap<String, serde_json::Value>> {
    match state.pool.get().await {
        Ok(mut conn) => Json(settings_service::public_settings(&mut conn).await),
        Err(e) => {
            tracing::warn!("Database unavailable, serving default settings: {e}");
            Json(settings_service::merge_with_defaults(Vec::new()))
        }
    }
}

/// Legal page by type; unknown types are 404, everything else degrades
/// to the built-in text.
pub async fn legal(
    State(state): State<AppState>,
    Path(doc_type): Path<String>,
) -> ApiResult<Json<LegalPage>> {
    let doc_type: LegalDocType = doc_type
        .parse()
        .map_err(|_| ApiError::not_found("legal document", &doc_type))?;

    let page = match state.pool.get().await {
        Ok(mut conn) => legal_service::public_page(&mut conn, doc_type).await,
        Err(e) => {
            tracing::error!(doc_type = doc_type.as_str(), "Database unavailable for legal page: {e}");
            LegalPage::fallback(doc_type)
        }
    };
    Ok(Json(page))
}
