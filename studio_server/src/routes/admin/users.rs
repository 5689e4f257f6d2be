//! User management (admin only).

use axum::extract::{Query, State};
use axum::response::Json;
use axum::Extension;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::SessionUser;
use crate::error::{ApiError, ApiResult};
use crate::models::profile::{Profile, ProfileChanges, Role};
use crate::models::validation;
use crate::routes::extractors::{JsonBody, UuidId};
use crate::services::profile_service;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

impl UpdateUserRequest {
    /// Validate the request as issued by `actor` against `target`.
    pub fn into_changes(self, actor: &SessionUser, target: uuid::Uuid) -> ApiResult<ProfileChanges> {
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;
        if actor.id == target {
            if role.is_some_and(|r| r != actor.role) {
                return Err(ApiError::BadRequest("you cannot change your own role".into()));
            }
            if self.active == Some(false) {
                return Err(ApiError::BadRequest("you cannot deactivate your own account".into()));
            }
        }
        Ok(ProfileChanges {
            full_name: validation::optional("full_name", self.full_name.as_deref(), 120)?,
            phone: validation::optional("phone", self.phone.as_deref(), 40)?,
            role: role.map(|r| r.as_str().to_string()),
            active: self.active,
            updated_at: Utc::now(),
        })
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<Profile>>> {
    let role = query
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(str::parse::<Role>)
        .transpose()?;
    let mut conn = state.pool.get().await?;
    Ok(Json(profile_service::list_profiles(&mut conn, role).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    UuidId(user_id): UuidId,
) -> ApiResult<Json<Profile>> {
    let mut conn = state.pool.get().await?;
    profile_service::get_profile(&mut conn, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("user", user_id))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<SessionUser>,
    UuidId(user_id): UuidId,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<Profile>> {
    let changes = req.into_changes(&actor, user_id)?;
    let mut conn = state.pool.get().await?;
    let profile = profile_service::update_profile(&mut conn, user_id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("user", user_id))?;
    tracing::info!(actor = %actor.id, user_id = %user_id, "User updated by admin");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn admin() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "owner@stagecut.studio".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn admin_cannot_demote_or_deactivate_self() {
        let actor = admin();
        let demote = UpdateUserRequest {
            role: Some("staff".into()),
            ..Default::default()
        };
        assert!(matches!(
            demote.into_changes(&actor, actor.id),
            Err(ApiError::BadRequest(_))
        ));

        let deactivate = UpdateUserRequest {
            active: Some(false),
            ..Default::default()
        };
        assert!(matches!(
            deactivate.into_changes(&actor, actor.id),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn admin_may_edit_own_details_and_other_roles() {
        let actor = admin();
        let rename = UpdateUserRequest {
            full_name: Some("  Min Park ".into()),
            role: Some("admin".into()),
            ..Default::default()
        };
        let changes = rename.into_changes(&actor, actor.id).unwrap();
        assert_eq!(changes.full_name.as_deref(), Some("Min Park"));

        let promote = UpdateUserRequest {
            role: Some("STAFF".into()),
            ..Default::default()
        };
        let changes = promote.into_changes(&actor, Uuid::new_v4()).unwrap();
        assert_eq!(changes.role.as_deref(), Some("staff"));
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let req = UpdateUserRequest {
            role: Some("owner".into()),
            ..Default::default()
        };
        assert!(matches!(
            req.into_changes(&admin(), Uuid::new_v4()),
            Err(ApiError::Validation(_))
        ));
    }
}
