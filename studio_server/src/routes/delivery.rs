//! Deliverable download redirect.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::error::{ApiError, ApiResult};
use crate::models::validation;
use crate::routes::extractors::NumericId;
use crate::services::delivery_service;
use crate::state::AppState;

/// Client address: first `X-Forwarded-For` hop, else the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// `GET /api/deliverables/{id}/download`: log the download and redirect
/// to the externally hosted file.
pub async fn download(
    State(state): State<AppState>,
    NumericId(deliverable_id): NumericId,
    req: Request,
) -> ApiResult<Response> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip_address = client_ip(req.headers(), peer);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(512).collect::<String>());

    let mut conn = state.pool.get().await?;

    let deliverable = delivery_service::get_deliverable(&mut conn, deliverable_id)
        .await?
        .filter(|d| d.is_available(Utc::now()))
        .ok_or_else(|| ApiError::not_found("deliverable", deliverable_id))?;

    let target = validation::http_url("external_url", &deliverable.external_url).map_err(|_| {
        tracing::warn!(deliverable_id, "Deliverable has no usable download link");
        ApiError::not_found("deliverable", deliverable_id)
    })?;

    if let Err(e) =
        delivery_service::record_download(&mut conn, deliverable_id, ip_address, user_agent).await
    {
        tracing::error!(deliverable_id, "Failed to record download: {e}");
    }

    tracing::info!(deliverable_id, "Download redirect issued");
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn falls_back_to_peer_address() {
        let peer: SocketAddr = "198.51.100.4:443".parse().unwrap();
        assert_eq!(
            client_ip(&HeaderMap::new(), Some(peer)).as_deref(),
            Some("198.51.100.4")
        );
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }
}
