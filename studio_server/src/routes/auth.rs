//! Login, logout and session endpoints.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::access::safe_next;
use crate::auth::{AuthError, SessionUser, SESSION_COOKIE};
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::profile::Profile;
use crate::models::validation::{self, ValidationError};
use crate::routes::extractors::JsonBody;
use crate::services::profile_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Profile,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// `Set-Cookie` value for the session token.
pub fn session_cookie(config: &AppConfig, token: &str, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age_secs.max(0)
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn set_cookie(value: String) -> ApiResult<[(header::HeaderName, HeaderValue); 1]> {
    let value = HeaderValue::from_str(&value)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("invalid cookie header: {e}")))?;
    Ok([(header::SET_COOKIE, value)])
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Response> {
    let email = validation::email("email", &req.email)?;
    if req.password.is_empty() {
        return Err(ValidationError::Empty { field: "password" }.into());
    }

    let session = match state.auth.sign_in(&email, &req.password).await {
        Ok(session) => session,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(email = %email, "Login rejected");
            crate::metrics::login_attempt("rejected");
            return Err(ApiError::Unauthorized("invalid email or password".into()));
        }
        Err(e) => {
            crate::metrics::login_attempt("error");
            return Err(ApiError::Gateway(e.to_string()));
        }
    };

    let mut conn = state.pool.get().await?;
    let profile_email = session.user.email.clone().unwrap_or(email);
    let profile = profile_service::ensure_profile(&mut conn, session.user.id, &profile_email).await?;
    if !profile.active {
        crate::metrics::login_attempt("inactive");
        return Err(ApiError::Forbidden("account is deactivated".into()));
    }

    let redirect_to = if profile.role().is_staff() {
        safe_next(req.next.as_deref())
    } else {
        "/".to_string()
    };
    let max_age = session
        .expires_in
        .unwrap_or(state.config.session_max_age_secs)
        .min(state.config.session_max_age_secs);
    let cookie = set_cookie(session_cookie(&state.config, &session.access_token, max_age))?;

    tracing::info!(user_id = %profile.id, role = %profile.role, "User signed in");
    crate::metrics::login_attempt("success");

    Ok((
        cookie,
        Json(LoginResponse {
            user: profile,
            redirect_to,
        }),
    )
        .into_response())
}

/// `POST /auth/logout`
pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = set_cookie(session_cookie(&state.config, "", 0))?;
    Ok((StatusCode::NO_CONTENT, cookie).into_response())
}

/// `GET /auth/session`: the signed-in user, if any.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<serde_json::Value>> {
    let Some(token) = crate::auth::session_token(&headers) else {
        return Ok(Json(json!({ "user": null })));
    };
    let user = state.sessions.resolve(&token).await?;
    Ok(Json(json!({ "user": user })))
}

/// `GET /login`, reached only by visitors the access guard lets
/// through; the page itself is rendered by the frontend.
pub async fn login_page(
    user: Option<Extension<SessionUser>>,
    Query(query): Query<NextQuery>,
) -> Json<serde_json::Value> {
    Json(json!({
        "next": safe_next(query.next.as_deref()),
        "signed_in": user.is_some(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_flags() {
        let mut config = AppConfig::from_lookup(|_| None);
        config.cookie_secure = false;
        assert_eq!(
            session_cookie(&config, "tok", 3600),
            "sc_session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );

        config.cookie_secure = true;
        let cookie = session_cookie(&config, "", 0);
        assert!(cookie.starts_with("sc_session=; "));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
    }
}
