//! Dashboard API under `/admin`. Every route here sits behind the access
//! guard, which has already resolved the [`SessionUser`](crate::auth::SessionUser).

pub mod analytics;
pub mod catalog;
pub mod content;
pub mod deliverables;
pub mod pipeline;
pub mod settings;
pub mod users;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 204 when a row was deleted, 404 otherwise.
pub(crate) fn deleted(found: bool, resource: &'static str, id: impl ToString) -> ApiResult<StatusCode> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(resource, id))
    }
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(analytics::overview))
        // Pipeline
        .route("/admin/pipeline", get(pipeline::board).post(pipeline::create_card))
        .route(
            "/admin/pipeline/{id}",
            get(pipeline::get_card)
                .patch(pipeline::update_card)
                .delete(pipeline::delete_card),
        )
        .route("/admin/pipeline/{id}/move", post(pipeline::move_card))
        .route("/admin/pipeline/{id}/advance", post(pipeline::advance_card))
        // Analytics
        .route("/admin/analytics/revenue", get(analytics::revenue_summary))
        .route("/admin/analytics/revenue_by_month", get(analytics::revenue_by_month))
        .route("/admin/analytics/orders_by_package", get(analytics::orders_by_package))
        .route("/admin/analytics/cards_by_stage", get(analytics::cards_by_stage))
        .route("/admin/analytics/downloads_by_day", get(analytics::downloads_by_day))
        // Users
        .route("/admin/users", get(users::list_users))
        .route("/admin/users/{id}", get(users::get_user).patch(users::update_user))
        // Deliverables
        .route(
            "/admin/deliverables",
            get(deliverables::list_deliverables).post(deliverables::create_deliverable),
        )
        .route(
            "/admin/deliverables/{id}",
            get(deliverables::get_deliverable)
                .patch(deliverables::update_deliverable)
                .delete(deliverables::delete_deliverable),
        )
        // Portfolio / showcase
        .route(
            "/admin/portfolio",
            get(content::list_portfolio).post(content::create_portfolio),
        )
        .route(
            "/admin/portfolio/{id}",
            axum::routing::patch(content::update_portfolio).delete(content::delete_portfolio),
        )
        .route(
            "/admin/showcase",
            get(content::list_showcase).post(content::create_showcase),
        )
        .route(
            "/admin/showcase/{id}",
            axum::routing::patch(content::update_showcase).delete(content::delete_showcase),
        )
        // Catalog
        .route("/admin/packages", get(catalog::list_packages).post(catalog::create_package))
        .route(
            "/admin/packages/{id}",
            get(catalog::get_package)
                .patch(catalog::update_package)
                .delete(catalog::delete_package),
        )
        .route("/admin/events", get(catalog::list_events).post(catalog::create_event))
        .route(
            "/admin/events/{id}",
            get(catalog::get_event)
                .patch(catalog::update_event)
                .delete(catalog::delete_event),
        )
        .route("/admin/orders", get(catalog::list_orders))
        .route("/admin/orders/{id}", get(catalog::get_order))
        // Settings, legal, FAQs
        .route("/admin/settings", get(settings::list_settings))
        .route(
            "/admin/settings/{key}",
            axum::routing::put(settings::upsert_setting).delete(settings::delete_setting),
        )
        .route("/admin/legal", get(settings::list_legal).post(settings::create_legal))
        .route("/admin/legal/{id}/activate", post(settings::activate_legal))
        .route("/admin/faqs", get(content::list_faqs).post(content::create_faq))
        .route(
            "/admin/faqs/{id}",
            axum::routing::patch(content::update_faq).delete(content::delete_faq),
        )
}
