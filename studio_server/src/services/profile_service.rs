//! Profiles — role lookups for auth and the user-management screens.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::models::profile::{NewProfile, Profile, ProfileChanges, Role};
use crate::schema::profiles;

pub async fn list_profiles(
    conn: &mut AsyncPgConnection,
    role: Option<Role>,
) -> anyhow::Result<Vec<Profile>> {
    let mut query = profiles::table
        .order(profiles::created_at.desc())
        .select(Profile::as_select())
        .into_boxed();
    if let Some(role) = role {
        query = query.filter(profiles::role.eq(role.as_str()));
    }
    Ok(query.load(conn).await?)
}

pub async fn get_profile(conn: &mut AsyncPgConnection, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let result = profiles::table
        .find(user_id)
        .select(Profile::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Fetch the profile for an authenticated user, creating a `client`
/// profile on first sight.
pub async fn ensure_profile(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    email: &str,
) -> anyhow::Result<Profile> {
    let inserted = diesel::insert_into(profiles::table)
        .values(&NewProfile {
            id: user_id,
            email: email.to_string(),
            full_name: None,
            role: Role::Client.as_str().to_string(),
        })
        .on_conflict(profiles::id)
        .do_nothing()
        .execute(conn)
        .await?;
    if inserted > 0 {
        tracing::info!(user_id = %user_id, "Profile created on first sign-in");
    }

    let profile = profiles::table
        .find(user_id)
        .select(Profile::as_select())
        .first(conn)
        .await?;
    Ok(profile)
}

pub async fn update_profile(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    changes: ProfileChanges,
) -> anyhow::Result<Option<Profile>> {
    let result = diesel::update(profiles::table.find(user_id))
        .set(&changes)
        .returning(Profile::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    if let Some(profile) = &result {
        tracing::info!(user_id = %profile.id, role = %profile.role, "Profile updated");
    }
    Ok(result)
}
