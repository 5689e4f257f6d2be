//! Site settings — key/value rows with built-in defaults.

use std::collections::BTreeMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::setting::{Setting, UpsertSetting, DEFAULT_SETTINGS};
use crate::schema::settings;

pub async fn list_settings(conn: &mut AsyncPgConnection) -> anyhow::Result<Vec<Setting>> {
    let results = settings::table
        .order(settings::key.asc())
        .select(Setting::as_select())
        .load(conn)
        .await?;
    Ok(results)
}

/// Insert or replace a setting by key.
pub async fn upsert_setting(
    conn: &mut AsyncPgConnection,
    setting: UpsertSetting,
) -> anyhow::Result<Setting> {
    let result = diesel::insert_into(settings::table)
        .values(&setting)
        .on_conflict(settings::key)
        .do_update()
        .set((
            settings::value.eq(excluded(settings::value)),
            settings::description.eq(excluded(settings::description)),
            settings::updated_at.eq(Utc::now()),
        ))
        .returning(Setting::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(key = %result.key, "Setting saved");
    Ok(result)
}

pub async fn delete_setting(conn: &mut AsyncPgConnection, key: &str) -> anyhow::Result<bool> {
    let deleted = diesel::delete(settings::table.filter(settings::key.eq(key)))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

/// Overlay stored rows on the defaults. Missing well-known keys are logged.
pub fn merge_with_defaults(rows: Vec<Setting>) -> BTreeMap<String, serde_json::Value> {
    let mut merged: BTreeMap<String, serde_json::Value> = rows
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect();
    for (key, default) in DEFAULT_SETTINGS {
        if !merged.contains_key(key) {
            tracing::warn!(key, "Setting missing, using default");
            merged.insert(key.to_string(), serde_json::Value::String(default.to_string()));
        }
    }
    merged
}

/// Settings for the public site. A failed query falls back to defaults.
pub async fn public_settings(conn: &mut AsyncPgConnection) -> BTreeMap<String, serde_json::Value> {
    match list_settings(conn).await {
        Ok(rows) => merge_with_defaults(rows),
        Err(e) => {
            tracing::error!("Failed to load settings, serving defaults: {e}");
            merge_with_defaults(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: serde_json::Value) -> Setting {
        let now = Utc::now();
        Setting {
            id: 1,
            key: key.to_string(),
            value,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stored_values_override_defaults() {
        let merged = merge_with_defaults(vec![
            row("site_name", serde_json::json!("Iron Frames")),
            row("hero_video", serde_json::json!("https://v.example.com/hero")),
        ]);
        assert_eq!(merged["site_name"], "Iron Frames");
        assert_eq!(merged["hero_video"], "https://v.example.com/hero");
        assert_eq!(merged["delivery_days"], "14");
    }

    #[test]
    fn empty_table_yields_every_default() {
        let merged = merge_with_defaults(Vec::new());
        assert_eq!(merged.len(), DEFAULT_SETTINGS.len());
    }
}
