//! orders — Paid orders created from verified payment-gateway webhooks.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::orders;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = orders)]
pub struct Order {
    pub id: i64,
    pub gateway_order_id: String,
    pub payment_key: String,
    pub amount_cents: i64,
    pub status: String,
    pub package_id: Option<i64>,
    pub event_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub athlete_name: Option<String>,
    pub athlete_number: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub gateway_order_id: String,
    pub payment_key: String,
    pub amount_cents: i64,
    pub status: String,
    pub package_id: Option<i64>,
    pub event_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub athlete_name: Option<String>,
    pub athlete_number: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub metadata: serde_json::Value,
}

/// Checkout details the storefront embeds in the payment's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMetadata {
    #[serde(default, deserialize_with = "lenient_id")]
    pub package_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub event_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub athlete_name: Option<String>,
    pub athlete_number: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Gateway metadata values are often strings; accept `12` or `"12"`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Option::<Id>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Id::Number(n)) => Ok(Some(n)),
        Some(Id::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Id::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}
