//! deliverables + download_logs — Externally hosted files handed to customers.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::validation::{self, ValidationError};
use crate::schema::{deliverables, download_logs};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = deliverables)]
pub struct Deliverable {
    pub id: i64,
    pub card_id: Option<i64>,
    pub order_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub title: String,
    pub external_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub download_count: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deliverable {
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = deliverables)]
pub struct NewDeliverable {
    pub card_id: Option<i64>,
    pub order_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub title: String,
    pub external_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = deliverables)]
pub struct DeliverableChanges {
    pub card_id: Option<i64>,
    pub order_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub title: Option<String>,
    pub external_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeliverableForm {
    pub card_id: Option<i64>,
    pub order_id: Option<i64>,
    pub profile_id: Option<Uuid>,
    pub title: Option<String>,
    pub external_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

impl DeliverableForm {
    pub fn into_new(self) -> Result<NewDeliverable, ValidationError> {
        Ok(NewDeliverable {
            card_id: self.card_id,
            order_id: self.order_id,
            profile_id: self.profile_id,
            title: validation::required("title", self.title.as_deref().unwrap_or_default(), 200)?,
            external_url: validation::http_url(
                "external_url",
                self.external_url.as_deref().unwrap_or_default(),
            )?,
            expires_at: self.expires_at,
            active: self.active.unwrap_or(true),
        })
    }

    pub fn into_changes(self) -> Result<DeliverableChanges, ValidationError> {
        Ok(DeliverableChanges {
            card_id: self.card_id,
            order_id: self.order_id,
            profile_id: self.profile_id,
            title: self
                .title
                .map(|t| validation::required("title", &t, 200))
                .transpose()?,
            external_url: self
                .external_url
                .map(|u| validation::http_url("external_url", &u))
                .transpose()?,
            expires_at: self.expires_at,
            active: self.active,
            updated_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = download_logs)]
pub struct DownloadLog {
    pub id: i64,
    pub deliverable_id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub downloaded_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = download_logs)]
pub struct NewDownloadLog {
    pub deliverable_id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn deliverable(active: bool, expires_at: Option<DateTime<Utc>>) -> Deliverable {
        let now = Utc::now();
        Deliverable {
            id: 1,
            card_id: None,
            order_id: None,
            profile_id: None,
            title: "Prejudging".into(),
            external_url: "https://drive.example.com/f/1".into(),
            expires_at,
            download_count: 0,
            active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn availability_respects_active_and_expiry() {
        let now = Utc::now();
        assert!(deliverable(true, None).is_available(now));
        assert!(deliverable(true, Some(now + Duration::days(1))).is_available(now));
        assert!(!deliverable(true, Some(now - Duration::seconds(1))).is_available(now));
        assert!(!deliverable(false, None).is_available(now));
    }

    #[test]
    fn form_rejects_non_http_links() {
        let form = DeliverableForm {
            title: Some("Finals".into()),
            external_url: Some("file:///etc/passwd".into()),
            ..Default::default()
        };
        assert!(form.into_new().is_err());
    }
}
