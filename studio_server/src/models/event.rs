//! events — Bodybuilding competitions the studio covers.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::validation::{self, ValidationError};
use crate::schema::events;

pub const EVENT_STATUSES: [&str; 3] = ["upcoming", "completed", "cancelled"];

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub organizer: Option<String>,
    pub venue: Option<String>,
    pub event_date: NaiveDate,
    pub status: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub name: String,
    pub organizer: Option<String>,
    pub venue: Option<String>,
    pub event_date: NaiveDate,
    pub status: String,
    pub active: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = events)]
pub struct EventChanges {
    pub name: Option<String>,
    pub organizer: Option<String>,
    pub venue: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventForm {
    pub name: Option<String>,
    pub organizer: Option<String>,
    pub venue: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub active: Option<bool>,
}

fn status(value: &str) -> Result<String, ValidationError> {
    let value = value.trim().to_ascii_lowercase();
    if EVENT_STATUSES.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidVariant {
            field: "status",
            value,
        })
    }
}

impl EventForm {
    pub fn into_new(self) -> Result<NewEvent, ValidationError> {
        Ok(NewEvent {
            name: validation::required("name", self.name.as_deref().unwrap_or_default(), 200)?,
            organizer: validation::optional("organizer", self.organizer.as_deref(), 200)?,
            venue: validation::optional("venue", self.venue.as_deref(), 200)?,
            event_date: self
                .event_date
                .ok_or(ValidationError::Empty { field: "event_date" })?,
            status: status(self.status.as_deref().unwrap_or("upcoming"))?,
            active: self.active.unwrap_or(true),
        })
    }

    pub fn into_changes(self) -> Result<EventChanges, ValidationError> {
        Ok(EventChanges {
            name: self
                .name
                .map(|n| validation::required("name", &n, 200))
                .transpose()?,
            organizer: validation::optional("organizer", self.organizer.as_deref(), 200)?,
            venue: validation::optional("venue", self.venue.as_deref(), 200)?,
            event_date: self.event_date,
            status: self.status.as_deref().map(status).transpose()?,
            active: self.active,
            updated_at: Utc::now(),
        })
    }
}
