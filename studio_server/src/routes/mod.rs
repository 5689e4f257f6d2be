//! Studio HTTP routes — public API, delivery, webhook, auth and dashboard.

pub mod admin;
pub mod auth;
pub mod delivery;
pub mod extractors;
pub mod public;
pub mod webhook;

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::access_guard;
use crate::error::ApiResult;
use crate::state::AppState;

/// Build the application router.
pub fn app_router(state: AppState) -> Router {
    // Dashboard and login page go through the access guard.
    let guarded = admin::admin_router()
        .route("/login", get(auth::login_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), access_guard));

    let cors = match HeaderValue::from_str(&state.config.public_site_url) {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(e) => {
            tracing::warn!("Invalid public site origin, CORS allows any: {e}");
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET, Method::OPTIONS])
    .allow_headers(Any)
    .max_age(Duration::from_secs(60 * 60));

    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        // Delivery and payments
        .route("/api/deliverables/{id}/download", get(delivery::download))
        .route("/api/webhooks/payment", post(webhook_handler))
        // Public site
        .route("/api/public/packages", get(public::packages))
        .route("/api/public/events", get(public::events))
        .route("/api/public/portfolio", get(public::portfolio))
        .route("/api/public/showcase", get(public::showcase))
        .route("/api/public/faqs", get(public::faqs))
        .route("/api/public/settings", get(public::settings))
        .route("/api/public/legal/{doc_type}", get(public::legal))
        .merge(guarded)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    webhook::handle_webhook(&state, &headers, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use tower::ServiceExt;

    use chrono::{TimeDelta, Utc};

    use crate::models::deliverable::NewDeliverable;
    use crate::services::payment_gateway::VerifiedPayment;
    use crate::services::{delivery_service, order_service, pipeline_service};
    use crate::test_support::{db_state, test_state, verified, PASSWORD};

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }

    fn get_as(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("sc_session={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str, extra: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in extra {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn sign(secret: &str, body: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn done_event(payment_key: &str, order_id: &str) -> String {
        serde_json::json!({
            "eventType": "PAYMENT_STATUS_CHANGED",
            "data": { "paymentKey": payment_key, "orderId": order_id, "status": "DONE" }
        })
        .to_string()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = app_router(test_state("", None));
        let (status, _, body) = send(app, get_as("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    // ── Access guard ──

    #[tokio::test]
    async fn anonymous_dashboard_request_redirects_to_login() {
        let app = app_router(test_state("", None));
        let (status, headers, _) = send(app, get_as("/admin/pipeline?stage=READY", None)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            headers[header::LOCATION],
            "/login?next=%2Fadmin%2Fpipeline%3Fstage%3DREADY"
        );
    }

    #[tokio::test]
    async fn staff_cannot_open_user_management() {
        let app = app_router(test_state("", None));
        let (status, headers, _) = send(app, get_as("/admin/users", Some("staff"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn client_is_sent_home() {
        let app = app_router(test_state("", None));
        let (status, headers, _) = send(app, get_as("/admin", Some("client"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn login_page_redirects_signed_in_staff() {
        let app = app_router(test_state("", None));
        let (status, headers, _) = send(app.clone(), get_as("/login", Some("admin"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/admin");

        let (status, _, body) = send(app, get_as("/login?next=/admin/faqs", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next"], "/admin/faqs");
        assert_eq!(body["signed_in"], false);
    }

    #[tokio::test]
    async fn unknown_token_is_treated_as_signed_out() {
        let app = app_router(test_state("", None));
        let (status, headers, _) = send(app, get_as("/admin/faqs", Some("bogus"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(headers[header::LOCATION]
            .to_str()
            .unwrap()
            .starts_with("/login?next="));
    }

    // ── Auth ──

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let app = app_router(test_state("", None));
        let body = r#"{"email":"crew@stagecut.studio","password":"nope"}"#;
        let (status, headers, json) = send(app, post_json("/auth/login", body, &[])).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthorized");
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn login_validates_email_before_calling_auth() {
        let app = app_router(test_state("", None));
        let body = format!(r#"{{"email":"not-an-email","password":"{PASSWORD}"}}"#);
        let (status, _, json) = send(app, post_json("/auth/login", &body, &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn logout_expires_cookie() {
        let app = app_router(test_state("", None));
        let (status, headers, _) = send(app, post_json("/auth/logout", "", &[])).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("sc_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn session_without_token_is_null() {
        let app = app_router(test_state("", None));
        let (status, _, json) = send(app, get_as("/auth/session", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["user"].is_null());
    }

    #[tokio::test]
    async fn session_reports_resolved_user() {
        let app = app_router(test_state("", None));
        let (status, _, json) = send(app, get_as("/auth/session", Some("staff"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["role"], "staff");
    }

    // ── Delivery ──

    #[tokio::test]
    async fn download_rejects_non_numeric_ids() {
        let app = app_router(test_state("", None));
        for uri in ["/api/deliverables/abc/download", "/api/deliverables/0/download"] {
            let (status, _, json) = send(app.clone(), get_as(uri, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"], "validation_error");
        }
    }

    // ── Webhook ──

    #[tokio::test]
    async fn webhook_rejects_bad_signature() {
        let app = app_router(test_state("whsec", None));
        let body = done_event("pk_1", "ORD-1");
        let req = post_json(
            "/api/webhooks/payment",
            &body,
            &[("x-payment-signature", "deadbeef")],
        );
        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthorized");
    }

    #[tokio::test]
    async fn webhook_ignores_other_events_and_statuses() {
        let app = app_router(test_state("whsec", None));
        for body in [
            r#"{"eventType":"DEPOSIT_CALLBACK","data":{"status":"DONE"}}"#,
            r#"{"eventType":"PAYMENT_STATUS_CHANGED","data":{"paymentKey":"pk","orderId":"o","status":"CANCELED"}}"#,
        ] {
            let sig = sign("whsec", body);
            let req = post_json("/api/webhooks/payment", body, &[("x-payment-signature", &sig)]);
            let (status, _, json) = send(app.clone(), req).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["ignored"], true);
        }
    }

    #[tokio::test]
    async fn webhook_rejects_malformed_and_incomplete_payloads() {
        let app = app_router(test_state("", None));
        let (status, _, _) = send(app.clone(), post_json("/api/webhooks/payment", "{oops", &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = r#"{"eventType":"PAYMENT_STATUS_CHANGED","data":{"orderId":"ORD-1","status":"DONE"}}"#;
        let (status, _, json) = send(app, post_json("/api/webhooks/payment", body, &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
    }

    #[tokio::test]
    async fn webhook_reports_gateway_failure() {
        let app = app_router(test_state("", None));
        let req = post_json("/api/webhooks/payment", &done_event("pk_missing", "ORD-1"), &[]);
        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "gateway_error");
    }

    #[tokio::test]
    async fn webhook_rejects_unverified_payment() {
        let app = app_router(test_state("", Some(verified("pk_1", "ORD-OTHER", "DONE"))));
        let req = post_json("/api/webhooks/payment", &done_event("pk_1", "ORD-1"), &[]);
        let (status, _, _) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let app = app_router(test_state("", Some(verified("pk_1", "ORD-1", "WAITING_FOR_DEPOSIT"))));
        let req = post_json("/api/webhooks/payment", &done_event("pk_1", "ORD-1"), &[]);
        let (status, _, _) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── Public ──

    #[tokio::test]
    async fn legal_page_falls_back_without_database() {
        let app = app_router(test_state("", None));
        let (status, _, json) = send(app, get_as("/api/public/legal/refund", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["doc_type"], "refund");
        assert_eq!(json["is_default"], true);
        assert!(json["body"].as_str().is_some_and(|b| !b.is_empty()));
    }

    #[tokio::test]
    async fn unknown_legal_type_is_not_found() {
        let app = app_router(test_state("", None));
        let (status, _, json) = send(app, get_as("/api/public/legal/cookies", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn settings_fall_back_to_defaults_without_database() {
        let app = app_router(test_state("", None));
        let (status, _, json) = send(app, get_as("/api/public/settings", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["site_name"], "Stagecut Studio");
        assert_eq!(json["delivery_days"], "14");
    }

    // ── Request bodies ──

    const STAFF_COOKIE: (&str, &str) = ("cookie", "sc_session=staff");

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let app = app_router(test_state("", None));
        let req = post_json("/admin/pipeline", "{\"athlete_name\":", &[STAFF_COOKIE]);
        let (status, _, json) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");

        let req = post_json("/admin/pipeline", r#"{"athlete_name":42}"#, &[STAFF_COOKIE]);
        let (status, _, json) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");

        let req = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .body(Body::from(r#"{"email":"a@b.co","password":"x"}"#))
            .unwrap();
        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn unknown_card_stage_is_a_validation_error() {
        let app = app_router(test_state("", None));
        let body = r#"{"athlete_name":"Kim","status":"archived"}"#;
        let (status, _, json) =
            send(app, post_json("/admin/pipeline", body, &[STAFF_COOKIE])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn card_stage_accepts_any_case() {
        let app = app_router(db_state(None).await);
        let body = r#"{"athlete_name":"Kim","status":"editing"}"#;
        let (status, _, json) =
            send(app, post_json("/admin/pipeline", body, &[STAFF_COOKIE])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["status"], "EDITING");
    }

    // ── Download redirect against a database ──

    fn deliverable(title: &str, url: &str, active: bool, expired: bool) -> NewDeliverable {
        NewDeliverable {
            card_id: None,
            order_id: None,
            profile_id: None,
            title: title.into(),
            external_url: url.into(),
            expires_at: expired.then(|| Utc::now() - TimeDelta::days(1)),
            active,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn download_redirects_and_logs() {
        let state = db_state(None).await;
        let ids = {
            let mut conn = state.pool.get().await.unwrap();
            let mut ids = Vec::new();
            for d in [
                deliverable("Finals", "https://files.example.com/finals.mp4", true, false),
                deliverable("Hidden", "https://files.example.com/hidden.mp4", false, false),
                deliverable("Old", "https://files.example.com/old.mp4", true, true),
                deliverable("Legacy", "ftp://files.example.com/legacy.mp4", true, false),
            ] {
                ids.push(delivery_service::create_deliverable(&mut conn, d).await.unwrap().id);
            }
            ids
        };
        let [ready, inactive, expired, ftp] = ids[..] else {
            panic!("four deliverables");
        };
        let app = app_router(state.clone());

        let req = Request::builder()
            .uri(format!("/api/deliverables/{ready}/download"))
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header(header::USER_AGENT, "stagecut-test")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(headers[header::LOCATION], "https://files.example.com/finals.mp4");

        for id in [inactive, expired, ftp, 999_999] {
            let uri = format!("/api/deliverables/{id}/download");
            let (status, headers, json) = send(app.clone(), get_as(&uri, None)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(json["error"], "not_found");
            assert!(headers.get(header::LOCATION).is_none());
        }

        let mut conn = state.pool.get().await.unwrap();
        let reloaded = delivery_service::get_deliverable(&mut conn, ready).await.unwrap().unwrap();
        assert_eq!(reloaded.download_count, 1);
        let logs = delivery_service::recent_downloads(&mut conn, ready, 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(logs[0].user_agent.as_deref(), Some("stagecut-test"));
        let untouched = delivery_service::get_deliverable(&mut conn, ftp).await.unwrap().unwrap();
        assert_eq!(untouched.download_count, 0);
    }

    // ── Webhook against a database ──

    fn paid(order_id: &str, metadata: serde_json::Value) -> VerifiedPayment {
        VerifiedPayment {
            metadata: Some(metadata),
            ..verified("pk_live", order_id, "DONE")
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn webhook_records_order_once_and_queues_card() {
        let metadata = serde_json::json!({ "athlete_name": "Lee", "athlete_number": "88" });
        let state = db_state(Some(paid("ORD-WH-1", metadata))).await;
        let app = app_router(state.clone());
        let body = done_event("pk_live", "ORD-WH-1");

        let (status, _, json) =
            send(app.clone(), post_json("/api/webhooks/payment", &body, &[])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["duplicate"], false);
        let order_id = json["order_id"].as_i64().unwrap();

        let (status, _, json) = send(app, post_json("/api/webhooks/payment", &body, &[])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["duplicate"], true);

        let mut conn = state.pool.get().await.unwrap();
        let order = order_service::get_order(&mut conn, order_id).await.unwrap().unwrap();
        assert_eq!(order.amount_cents, 99_000);
        let board = pipeline_service::board(&mut conn).await.unwrap();
        let cards: Vec<_> = board
            .iter()
            .flat_map(|column| column.cards.iter())
            .filter(|card| card.order_id == Some(order_id))
            .collect();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].status, "WAITING");
        assert_eq!(cards[0].athlete_number.as_deref(), Some("88"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn webhook_keeps_order_with_unknown_references() {
        let metadata = serde_json::json!({
            "package_id": 999_999,
            "event_id": "999999",
            "profile_id": uuid::Uuid::new_v4(),
            "athlete_name": "Lee"
        });
        let state = db_state(Some(paid("ORD-WH-2", metadata))).await;
        let app = app_router(state.clone());

        let req = post_json("/api/webhooks/payment", &done_event("pk_live", "ORD-WH-2"), &[]);
        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let mut conn = state.pool.get().await.unwrap();
        let order_id = json["order_id"].as_i64().unwrap();
        let order = order_service::get_order(&mut conn, order_id).await.unwrap().unwrap();
        assert_eq!(order.package_id, None);
        assert_eq!(order.event_id, None);
        assert_eq!(order.profile_id, None);
        assert_eq!(order.metadata["package_id"], 999_999);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn webhook_truncates_long_metadata() {
        let metadata = serde_json::json!({
            "athlete_name": "A".repeat(150),
            "athlete_number": "1".repeat(25),
            "contact_phone": "5".repeat(60)
        });
        let state = db_state(Some(paid("ORD-WH-3", metadata))).await;
        let app = app_router(state.clone());

        let req = post_json("/api/webhooks/payment", &done_event("pk_live", "ORD-WH-3"), &[]);
        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let mut conn = state.pool.get().await.unwrap();
        let order_id = json["order_id"].as_i64().unwrap();
        let order = order_service::get_order(&mut conn, order_id).await.unwrap().unwrap();
        assert_eq!(order.athlete_name.unwrap().len(), 120);
        assert_eq!(order.athlete_number.unwrap().len(), 20);
        assert_eq!(order.contact_phone.unwrap().len(), 40);
    }

    #[tokio::test]
    async fn webhook_rejects_oversized_order_id() {
        let order_id = "O".repeat(65);
        let app = app_router(test_state("", Some(verified("pk_1", &order_id, "DONE"))));
        let req = post_json("/api/webhooks/payment", &done_event("pk_1", &order_id), &[]);
        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
    }
}
