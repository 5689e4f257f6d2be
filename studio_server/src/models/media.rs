//! portfolio_items + showcase_items — Public media records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::validation::{self, ValidationError};
use crate::schema::{portfolio_items, showcase_items};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = portfolio_items)]
pub struct PortfolioItem {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = portfolio_items)]
pub struct NewPortfolioItem {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub published: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = portfolio_items)]
pub struct PortfolioItemChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: Option<i32>,
    pub published: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = showcase_items)]
pub struct ShowcaseItem {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = showcase_items)]
pub struct NewShowcaseItem {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: i32,
    pub published: bool,
    pub featured: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = showcase_items)]
pub struct ShowcaseItemChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: Option<i32>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

/// Admin form shared by portfolio and showcase items; `featured` only
/// applies to showcase items.
#[derive(Debug, Default, Deserialize)]
pub struct MediaForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: Option<i32>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
}

/// Validated field values common to both tables.
struct MediaFields {
    title: Option<String>,
    category: Option<String>,
    description: Option<String>,
    media_url: Option<String>,
    thumbnail_url: Option<String>,
}

impl MediaForm {
    fn validate(&self, creating: bool) -> Result<MediaFields, ValidationError> {
        let title = match (&self.title, creating) {
            (Some(t), _) => Some(validation::required("title", t, 200)?),
            (None, true) => return Err(ValidationError::Empty { field: "title" }),
            (None, false) => None,
        };
        let category = match (&self.category, creating) {
            (Some(c), _) => Some(validation::required("category", c, 60)?.to_lowercase()),
            (None, true) => return Err(ValidationError::Empty { field: "category" }),
            (None, false) => None,
        };
        let media_url = match (&self.media_url, creating) {
            (Some(u), _) => Some(validation::http_url("media_url", u)?),
            (None, true) => return Err(ValidationError::Empty { field: "media_url" }),
            (None, false) => None,
        };
        let thumbnail_url = self
            .thumbnail_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(|u| validation::http_url("thumbnail_url", u))
            .transpose()?;
        Ok(MediaFields {
            title,
            category,
            description: validation::optional("description", self.description.as_deref(), 4000)?,
            media_url,
            thumbnail_url,
        })
    }

    pub fn into_new_portfolio(self) -> Result<NewPortfolioItem, ValidationError> {
        let fields = self.validate(true)?;
        Ok(NewPortfolioItem {
            title: fields.title.unwrap_or_default(),
            category: fields.category.unwrap_or_default(),
            description: fields.description,
            media_url: fields.media_url.unwrap_or_default(),
            thumbnail_url: fields.thumbnail_url,
            display_order: self.display_order.unwrap_or(0),
            published: self.published.unwrap_or(false),
        })
    }

    pub fn into_portfolio_changes(self) -> Result<PortfolioItemChanges, ValidationError> {
        let fields = self.validate(false)?;
        Ok(PortfolioItemChanges {
            title: fields.title,
            category: fields.category,
            description: fields.description,
            media_url: fields.media_url,
            thumbnail_url: fields.thumbnail_url,
            display_order: self.display_order,
            published: self.published,
            updated_at: Utc::now(),
        })
    }

    pub fn into_new_showcase(self) -> Result<NewShowcaseItem, ValidationError> {
        let fields = self.validate(true)?;
        Ok(NewShowcaseItem {
            title: fields.title.unwrap_or_default(),
            category: fields.category.unwrap_or_default(),
            description: fields.description,
            media_url: fields.media_url.unwrap_or_default(),
            thumbnail_url: fields.thumbnail_url,
            display_order: self.display_order.unwrap_or(0),
            published: self.published.unwrap_or(false),
            featured: self.featured.unwrap_or(false),
        })
    }

    pub fn into_showcase_changes(self) -> Result<ShowcaseItemChanges, ValidationError> {
        let fields = self.validate(false)?;
        Ok(ShowcaseItemChanges {
            title: fields.title,
            category: fields.category,
            description: fields.description,
            media_url: fields.media_url,
            thumbnail_url: fields.thumbnail_url,
            display_order: self.display_order,
            published: self.published,
            featured: self.featured,
            updated_at: Utc::now(),
        })
    }
}
