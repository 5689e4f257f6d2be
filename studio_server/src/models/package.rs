//! packages — Sellable coverage packages shown on the public site.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::validation::{self, ValidationError};
use crate::schema::packages;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = packages)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub features: serde_json::Value,
    pub display_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = packages)]
pub struct NewPackage {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub features: serde_json::Value,
    pub display_order: i32,
    pub active: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = packages)]
pub struct PackageChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i32>,
    pub features: Option<serde_json::Value>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

/// Admin form for creating or editing a package.
#[derive(Debug, Default, Deserialize)]
pub struct PackageForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i32>,
    pub features: Option<Vec<String>>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

fn clean_features(features: Vec<String>) -> serde_json::Value {
    features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .into()
}

impl PackageForm {
    pub fn into_new(self) -> Result<NewPackage, ValidationError> {
        Ok(NewPackage {
            name: validation::required("name", self.name.as_deref().unwrap_or_default(), 120)?,
            description: validation::optional("description", self.description.as_deref(), 4000)?,
            price_cents: validation::non_negative("price_cents", self.price_cents.unwrap_or(0))?,
            features: clean_features(self.features.unwrap_or_default()),
            display_order: self.display_order.unwrap_or(0),
            active: self.active.unwrap_or(true),
        })
    }

    pub fn into_changes(self) -> Result<PackageChanges, ValidationError> {
        Ok(PackageChanges {
            name: self
                .name
                .map(|n| validation::required("name", &n, 120))
                .transpose()?,
            description: validation::optional("description", self.description.as_deref(), 4000)?,
            price_cents: self
                .price_cents
                .map(|p| validation::non_negative("price_cents", p))
                .transpose()?,
            features: self.features.map(clean_features),
            display_order: self.display_order,
            active: self.active,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_package_requires_name_and_cleans_features() {
        let form = PackageForm {
            name: Some(" Stage Pack ".into()),
            price_cents: Some(15_000),
            features: Some(vec!["4K video".into(), "  ".into(), " Photos ".into()]),
            ..Default::default()
        };
        let new = form.into_new().unwrap();
        assert_eq!(new.name, "Stage Pack");
        assert_eq!(new.features, serde_json::json!(["4K video", "Photos"]));
        assert!(new.active);

        assert!(PackageForm::default().into_new().is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let form = PackageForm {
            name: Some("Basic".into()),
            price_cents: Some(-5),
            ..Default::default()
        };
        assert!(matches!(
            form.into_new(),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn partial_update_leaves_unset_fields() {
        let changes = PackageForm {
            active: Some(false),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.active, Some(false));
        assert!(changes.name.is_none());
        assert!(changes.features.is_none());
    }
}
