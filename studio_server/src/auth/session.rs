//! Session lookup: cookie/bearer token → authenticated user with role.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::client::AuthProvider;
use crate::db::DbPool;
use crate::models::profile::Role;
use crate::services::profile_service;

/// Name of the HttpOnly cookie holding the access token.
pub const SESSION_COOKIE: &str = "sc_session";

/// The signed-in user attached to request extensions by the access guard.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<SessionUser>>;
}

/// Token from the session cookie, else from `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
        })
        .filter(|t| !t.is_empty())
}

/// Resolves tokens against the hosted auth service and reads the role
/// from `profiles`. Deactivated profiles resolve to no session.
pub struct HostedSessions {
    auth: Arc<dyn AuthProvider>,
    pool: DbPool,
}

impl HostedSessions {
    pub fn new(auth: Arc<dyn AuthProvider>, pool: DbPool) -> Self {
        Self { auth, pool }
    }
}

#[async_trait]
impl SessionResolver for HostedSessions {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<SessionUser>> {
        let Some(user) = self.auth.user_for_token(token).await? else {
            return Ok(None);
        };

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("database pool: {e}"))?;
        let email = user.email.unwrap_or_default();
        let profile = profile_service::ensure_profile(&mut conn, user.id, &email).await?;
        if !profile.active {
            tracing::info!(user_id = %profile.id, "Session for deactivated profile rejected");
            return Ok(None);
        }

        Ok(Some(SessionUser {
            id: profile.id,
            role: profile.role(),
            email: profile.email,
        }))
    }
}
