//! Route access rules for the dashboard and login page.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::session::{session_token, SessionUser};
use crate::models::profile::Role;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/admin";

/// Dashboard sections only admins may open.
const ADMIN_ONLY_PREFIXES: [&str; 3] = ["/admin/users", "/admin/settings", "/admin/legal"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn is_admin_only(path: &str) -> bool {
    ADMIN_ONLY_PREFIXES.iter().any(|prefix| under(path, prefix))
}

/// Decide whether `user` may open `path`. `path_and_query` is echoed back
/// in the login redirect's `next` parameter.
pub fn decide(path: &str, path_and_query: &str, user: Option<&SessionUser>) -> Access {
    if path == LOGIN_PATH {
        return match user {
            Some(u) if u.role.is_staff() => Access::Redirect(DASHBOARD_PATH.to_string()),
            _ => Access::Allow,
        };
    }

    if !under(path, DASHBOARD_PATH) {
        return Access::Allow;
    }

    match user {
        None => Access::Redirect(format!(
            "{LOGIN_PATH}?next={}",
            urlencoding::encode(path_and_query)
        )),
        Some(u) if !u.role.is_staff() => Access::Redirect("/".to_string()),
        Some(u) if u.role != Role::Admin && is_admin_only(path) => {
            Access::Redirect(DASHBOARD_PATH.to_string())
        }
        Some(_) => Access::Allow,
    }
}

/// Only same-site absolute paths are honoured as post-login targets.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n.to_string(),
        _ => DASHBOARD_PATH.to_string(),
    }
}

/// Middleware resolving the session and applying [`decide`]. Allowed
/// requests carry the [`SessionUser`] in their extensions.
pub async fn access_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = match session_token(req.headers()) {
        Some(token) => match state.sessions.resolve(&token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Session lookup failed, treating as signed out: {e:#}");
                None
            }
        },
        None => None,
    };

    let path = req.uri().path().to_string();
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    match decide(&path, &path_and_query, user.as_ref()) {
        Access::Allow => {
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
        Access::Redirect(target) => {
            tracing::debug!(path = %path, target = %target, "Access redirect");
            Redirect::to(&target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "crew@stagecut.studio".into(),
            role,
        }
    }

    #[test]
    fn anonymous_admin_request_goes_to_login_with_next() {
        assert_eq!(
            decide("/admin/pipeline", "/admin/pipeline?stage=READY", None),
            Access::Redirect("/login?next=%2Fadmin%2Fpipeline%3Fstage%3DREADY".into())
        );
        assert_eq!(
            decide("/admin", "/admin", None),
            Access::Redirect("/login?next=%2Fadmin".into())
        );
    }

    #[test]
    fn staff_is_bounced_from_admin_only_sections() {
        let staff = user(Role::Staff);
        for path in ["/admin/users", "/admin/users/abc", "/admin/settings", "/admin/legal/3/activate"] {
            assert_eq!(
                decide(path, path, Some(&staff)),
                Access::Redirect("/admin".into()),
                "{path}"
            );
        }
        assert_eq!(decide("/admin/pipeline", "/admin/pipeline", Some(&staff)), Access::Allow);
        assert_eq!(decide("/admin", "/admin", Some(&staff)), Access::Allow);
    }

    #[test]
    fn admin_may_open_everything() {
        let admin = user(Role::Admin);
        for path in ["/admin", "/admin/users", "/admin/settings", "/admin/analytics/revenue"] {
            assert_eq!(decide(path, path, Some(&admin)), Access::Allow, "{path}");
        }
    }

    #[test]
    fn clients_are_sent_home() {
        let client = user(Role::Client);
        assert_eq!(
            decide("/admin/pipeline", "/admin/pipeline", Some(&client)),
            Access::Redirect("/".into())
        );
    }

    #[test]
    fn signed_in_staff_skip_login_page() {
        assert_eq!(
            decide("/login", "/login", Some(&user(Role::Staff))),
            Access::Redirect("/admin".into())
        );
        assert_eq!(decide("/login", "/login", None), Access::Allow);
        assert_eq!(decide("/login", "/login", Some(&user(Role::Client))), Access::Allow);
    }

    #[test]
    fn prefix_match_respects_segments() {
        assert_eq!(decide("/administrator", "/administrator", None), Access::Allow);
        assert_eq!(
            decide("/admin/usersettings", "/admin/usersettings", Some(&user(Role::Staff))),
            Access::Allow
        );
        assert_eq!(decide("/api/public/faqs", "/api/public/faqs", None), Access::Allow);
    }

    #[test]
    fn next_target_must_be_local() {
        assert_eq!(safe_next(Some("/admin/pipeline")), "/admin/pipeline");
        assert_eq!(safe_next(Some("//evil.example.com")), "/admin");
        assert_eq!(safe_next(Some("https://evil.example.com")), "/admin");
        assert_eq!(safe_next(Some("/\\evil.example.com")), "/admin");
        assert_eq!(safe_next(None), "/admin");
    }
}
