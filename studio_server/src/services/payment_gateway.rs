//! Payment gateway integration — webhook signature validation and
//! payment verification against the gateway's REST API.

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::models::order::OrderMetadata;

type HmacSha256 = Hmac<Sha256>;

/// Gateway status of a completed payment.
pub const STATUS_DONE: &str = "DONE";

/// Check the `x-payment-signature` header: hex HMAC-SHA256 of the raw
/// body under the webhook secret, with an optional `sha256=` tag.
/// An unset secret accepts every delivery.
pub fn validate_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        tracing::warn!("Webhook secret not configured, accepting unsigned delivery");
        return true;
    }

    let digest = signature.trim();
    let digest = digest.strip_prefix("sha256=").unwrap_or(digest);
    let Ok(expected) = hex::decode(digest) else {
        return false;
    };

    HmacSha256::new_from_slice(secret.as_bytes())
        .map(|mut mac| {
            mac.update(payload);
            mac.verify_slice(&expected).is_ok()
        })
        .unwrap_or(false)
}

/// A payment as reported by the gateway's lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub payment_key: String,
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub total_amount: i64,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("payment gateway returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Look up a payment by its key.
    async fn fetch_payment(&self, payment_key: &str) -> Result<VerifiedPayment, GatewayError>;
}

/// REST client for the hosted payment gateway.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: &str, secret_key: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("stagecut")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn fetch_payment(&self, payment_key: &str) -> Result<VerifiedPayment, GatewayError> {
        let url = format!(
            "{}/v1/payments/{}",
            self.base_url,
            urlencoding::encode(payment_key)
        );

        // Secret key as username, empty password.
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.secret_key, Some(""))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        Ok(resp.json::<VerifiedPayment>().await?)
    }
}

/// Decode the checkout metadata blob. The gateway returns it either as a
/// JSON object or as a JSON-encoded string; anything unreadable is logged
/// and treated as empty.
pub fn parse_metadata(raw: Option<&serde_json::Value>) -> OrderMetadata {
    let parsed = match raw {
        None | Some(serde_json::Value::Null) => return OrderMetadata::default(),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => {
            return OrderMetadata::default()
        }
        Some(serde_json::Value::String(s)) => serde_json::from_str::<OrderMetadata>(s),
        Some(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value::<OrderMetadata>(value.clone())
        }
        Some(other) => {
            tracing::warn!(kind = json_kind(other), "Payment metadata is not an object, ignoring");
            return OrderMetadata::default();
        }
    };

    parsed.unwrap_or_else(|e| {
        tracing::warn!("Unreadable payment metadata, ignoring: {e}");
        OrderMetadata::default()
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
