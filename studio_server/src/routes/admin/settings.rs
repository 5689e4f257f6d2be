//! Site settings and legal documents (admin only).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::legal::{LegalDocType, LegalDocument, LegalDocumentForm};
use crate::models::setting::{self, Setting, SettingForm, UpsertSetting};
use crate::models::validation;
use crate::routes::extractors::{JsonBody, NumericId};
use crate::services::{legal_service, settings_service};
use crate::state::AppState;

use super::deleted;

// ── Settings ──

pub async fn list_settings(State(state): State<AppState>) -> ApiResult<Json<Vec<Setting>>> {
    let mut conn = state.pool.get().await?;
    Ok(Json(settings_service::list_settings(&mut conn).await?))
}

pub async fn upsert_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    JsonBody(form): JsonBody<SettingForm>,
) -> ApiResult<Json<Setting>> {
    let key = setting::validate_key(&key)?;
    let upsert = UpsertSetting {
        key,
        value: form.value,
        description: validation::optional("description", form.description.as_deref(), 500)?,
    };
    let mut conn = state.pool.get().await?;
    Ok(Json(settings_service::upsert_setting(&mut conn, upsert).await?))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    let found = settings_service::delete_setting(&mut conn, &key).await?;
    deleted(found, "setting", key)
}

// ── Legal ──

#[derive(Debug, Default, Deserialize)]
pub struct LegalListQuery {
    pub doc_type: Option<String>,
}

pub async fn list_legal(
    State(state): State<AppState>,
    Query(query): Query<LegalListQuery>,
) -> ApiResult<Json<Vec<LegalDocument>>> {
    let doc_type = query
        .doc_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::parse::<LegalDocType>)
        .transpose()?;
    let mut conn = state.pool.get().await?;
    Ok(Json(legal_service::list_documents(&mut conn, doc_type).await?))
}

pub async fn create_legal(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LegalDocumentForm>,
) -> ApiResult<(StatusCode, Json<LegalDocument>)> {
    let new_doc = form.into_new()?;
    let mut conn = state.pool.get().await?;
    let doc = legal_service::create_document(&mut conn, new_doc).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn activate_legal(
    State(state): State<AppState>,
    NumericId(document_id): NumericId,
) -> ApiResult<Json<LegalDocument>> {
    let mut conn = state.pool.get().await?;
    legal_service::activate_document(&mut conn, document_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("legal document", document_id))
}
