//! Payment gateway webhook — verifies the payment and records the order.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::models::order::NewOrder;
use crate::models::pipeline::{NewPipelineCard, PipelineStage};
use crate::services::payment_gateway::{self, STATUS_DONE};
use crate::services::{order_service, pipeline_service};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-payment-signature";
pub const PAYMENT_STATUS_CHANGED: &str = "PAYMENT_STATUS_CHANGED";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub event_type: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub payment_key: Option<String>,
    pub order_id: Option<String>,
    pub status: Option<String>,
}

/// Longest gateway order id the orders table stores.
pub const MAX_ORDER_ID_LEN: usize = 64;

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Trim a metadata string and cut it to the column width on a char boundary.
fn clipped(field: &'static str, value: Option<String>, max: usize) -> Option<String> {
    let value = non_blank(value)?;
    if value.chars().count() <= max {
        return Some(value);
    }
    tracing::warn!(field, max, "Order metadata too long, truncating");
    Some(value.chars().take(max).collect::<String>().trim_end().to_string())
}

/// Handle an incoming payment webhook.
pub async fn handle_webhook(
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !payment_gateway::validate_signature(&state.config.webhook_secret, &body, signature) {
        tracing::warn!("Payment webhook signature validation failed");
        crate::metrics::webhook_received("rejected");
        return Err(ApiError::Unauthorized("invalid webhook signature".into()));
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        crate::metrics::webhook_received("rejected");
        ApiError::BadRequest(format!("invalid webhook payload: {e}"))
    })?;

    let status = payload.data.status.as_deref().unwrap_or_default();
    if payload.event_type != PAYMENT_STATUS_CHANGED || status != STATUS_DONE {
        tracing::debug!(
            event_type = %payload.event_type,
            status,
            "Ignoring payment webhook"
        );
        crate::metrics::webhook_received("ignored");
        return Ok((StatusCode::OK, Json(json!({ "ignored": true }))));
    }

    let (Some(payment_key), Some(order_id)) = (
        non_blank(payload.data.payment_key),
        non_blank(payload.data.order_id),
    ) else {
        crate::metrics::webhook_received("rejected");
        return Err(ApiError::BadRequest(
            "paymentKey and orderId are required".into(),
        ));
    };
    if order_id.chars().count() > MAX_ORDER_ID_LEN {
        crate::metrics::webhook_received("rejected");
        return Err(ApiError::BadRequest(format!(
            "orderId exceeds {MAX_ORDER_ID_LEN} characters"
        )));
    }

    let payment = state
        .gateway
        .fetch_payment(&payment_key)
        .await
        .map_err(|e| {
            tracing::error!(payment_key = %payment_key, "Payment verification failed: {e}");
            crate::metrics::webhook_received("gateway_error");
            ApiError::Gateway(e.to_string())
        })?;

    if payment.status != STATUS_DONE || payment.order_id != order_id {
        tracing::warn!(
            order_id = %order_id,
            verified_order_id = %payment.order_id,
            verified_status = %payment.status,
            "Payment verification mismatch"
        );
        crate::metrics::webhook_received("rejected");
        return Err(ApiError::BadRequest("payment could not be verified".into()));
    }

    let metadata = payment_gateway::parse_metadata(payment.metadata.as_ref());
    let mut new_order = NewOrder {
        gateway_order_id: order_id,
        payment_key: payment.payment_key,
        amount_cents: payment.total_amount,
        status: payment.status,
        package_id: metadata.package_id,
        event_id: metadata.event_id,
        profile_id: metadata.profile_id,
        athlete_name: clipped("athlete_name", metadata.athlete_name.clone(), 120),
        athlete_number: clipped("athlete_number", metadata.athlete_number.clone(), 20),
        contact_email: clipped("contact_email", metadata.contact_email.clone(), 254),
        contact_phone: clipped("contact_phone", metadata.contact_phone.clone(), 40),
        metadata: serde_json::to_value(&metadata).unwrap_or_default(),
    };

    let mut conn = state.pool.get().await?;
    order_service::drop_unknown_references(&mut conn, &mut new_order).await?;
    let Some(order) = order_service::insert_if_absent(&mut conn, new_order).await? else {
        crate::metrics::webhook_received("duplicate");
        return Ok((StatusCode::OK, Json(json!({ "duplicate": true }))));
    };

    if let Some(athlete_name) = order.athlete_name.clone() {
        let card = NewPipelineCard {
            order_id: Some(order.id),
            event_id: order.event_id,
            package_id: order.package_id,
            athlete_name,
            athlete_number: order.athlete_number.clone(),
            status: PipelineStage::Waiting.as_str().to_string(),
            position: 0,
            assignee_id: None,
            notes: None,
            due_date: None,
        };
        if let Err(e) = pipeline_service::create_card(&mut conn, card).await {
            tracing::error!(order_id = order.id, "Failed to create pipeline card for order: {e}");
        }
    }

    crate::metrics::webhook_received("created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "order_id": order.id, "duplicate": false })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_cuts_to_column_width() {
        let long = "A".repeat(150);
        assert_eq!(clipped("athlete_name", Some(long), 120).unwrap().len(), 120);
        assert_eq!(clipped("athlete_name", Some("  Lee ".into()), 120).as_deref(), Some("Lee"));
        assert_eq!(clipped("athlete_name", Some("   ".into()), 120), None);
    }

    #[test]
    fn clipped_respects_char_boundaries() {
        let name = "é".repeat(30);
        let cut = clipped("athlete_number", Some(name), 20).unwrap();
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
