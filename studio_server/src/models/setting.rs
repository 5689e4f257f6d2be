//! settings — Site-wide key/value configuration edited from the dashboard.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::validation::ValidationError;
use crate::schema::settings;

/// Well-known keys and the values served when a row is missing.
pub const DEFAULT_SETTINGS: [(&str, &str); 6] = [
    ("site_name", "Stagecut Studio"),
    ("contact_email", "hello@stagecut.studio"),
    ("contact_phone", ""),
    ("kakao_channel_url", ""),
    ("instagram_url", ""),
    ("delivery_days", "14"),
];

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = settings)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = settings)]
pub struct UpsertSetting {
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingForm {
    pub value: serde_json::Value,
    pub description: Option<String>,
}

/// Keys are lowercase snake_case, at most 64 characters.
pub fn validate_key(key: &str) -> Result<String, ValidationError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::Empty { field: "key" });
    }
    if key.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "key",
            max: 64,
        });
    }
    let valid = key.starts_with(|c: char| c.is_ascii_lowercase())
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "key",
            reason: "use lowercase letters, digits and underscores",
        });
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format() {
        assert_eq!(validate_key(" site_name ").unwrap(), "site_name");
        assert!(validate_key("Site-Name").is_err());
        assert!(validate_key("1st_key").is_err());
        assert!(validate_key("").is_err());
    }

    #[test]
    fn default_keys_are_valid() {
        for (key, _) in DEFAULT_SETTINGS {
            assert!(validate_key(key).is_ok(), "{key}");
        }
    }
}
