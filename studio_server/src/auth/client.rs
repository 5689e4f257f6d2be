//! Hosted auth service client (GoTrue-compatible REST API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a successful password sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("auth service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("auth service returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve an access token to its user; `None` when the token is
    /// invalid or expired.
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
}

pub struct HostedAuth {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedAuth {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("stagecut")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl AuthProvider for HostedAuth {
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match resp.status().as_u16() {
            200..=299 => Ok(Some(resp.json::<AuthUser>().await?)),
            401 | 403 => Ok(None),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(AuthError::Status { status, body })
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let resp = self
            .client
            .post(format!("{}/auth/v1/token?grant_type=password", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        match resp.status().as_u16() {
            200..=299 => Ok(resp.json::<AuthSession>().await?),
            400 | 401 | 403 => Err(AuthError::InvalidCredentials),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(AuthError::Status { status, body })
            }
        }
    }
}
