//! pipeline_cards — Work orders tracked on the production kanban board.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::validation::{self, ValidationError};
use crate::schema::pipeline_cards;

/// Production stage of a card. Stored as the uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PipelineStage {
    Waiting,
    Shooting,
    Editing,
    Ready,
    Delivered,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Waiting,
        PipelineStage::Shooting,
        PipelineStage::Editing,
        PipelineStage::Ready,
        PipelineStage::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Waiting => "WAITING",
            PipelineStage::Shooting => "SHOOTING",
            PipelineStage::Editing => "EDITING",
            PipelineStage::Ready => "READY",
            PipelineStage::Delivered => "DELIVERED",
        }
    }

    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Waiting => Some(PipelineStage::Shooting),
            PipelineStage::Shooting => Some(PipelineStage::Editing),
            PipelineStage::Editing => Some(PipelineStage::Ready),
            PipelineStage::Ready => Some(PipelineStage::Delivered),
            PipelineStage::Delivered => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == upper)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = pipeline_cards)]
pub struct PipelineCard {
    pub id: i64,
    pub order_id: Option<i64>,
    pub event_id: Option<i64>,
    pub package_id: Option<i64>,
    pub athlete_name: String,
    pub athlete_number: Option<String>,
    pub status: String,
    pub position: i32,
    pub assignee_id: Option<Uuid>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PipelineCard {
    /// Stage of the card; the column is CHECK-constrained, so unknown
    /// values only appear if the constraint was bypassed.
    pub fn stage(&self) -> PipelineStage {
        self.status.parse().unwrap_or(PipelineStage::Waiting)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pipeline_cards)]
pub struct NewPipelineCard {
    pub order_id: Option<i64>,
    pub event_id: Option<i64>,
    pub package_id: Option<i64>,
    pub athlete_name: String,
    pub athlete_number: Option<String>,
    pub status: String,
    pub position: i32,
    pub assignee_id: Option<Uuid>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = pipeline_cards)]
pub struct PipelineCardChanges {
    pub event_id: Option<i64>,
    pub package_id: Option<i64>,
    pub athlete_name: Option<String>,
    pub athlete_number: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardForm {
    pub order_id: Option<i64>,
    pub event_id: Option<i64>,
    pub package_id: Option<i64>,
    pub athlete_name: Option<String>,
    pub athlete_number: Option<String>,
    /// Starting column; any letter case. Defaults to WAITING.
    pub status: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl CardForm {
    pub fn into_new(self) -> Result<NewPipelineCard, ValidationError> {
        let stage = match self.status.as_deref().map(str::trim) {
            None | Some("") => PipelineStage::Waiting,
            Some(raw) => raw.parse()?,
        };
        Ok(NewPipelineCard {
            order_id: self.order_id,
            event_id: self.event_id,
            package_id: self.package_id,
            athlete_name: validation::required(
                "athlete_name",
                self.athlete_name.as_deref().unwrap_or_default(),
                120,
            )?,
            athlete_number: validation::optional("athlete_number", self.athlete_number.as_deref(), 20)?,
            status: stage.as_str().to_string(),
            position: 0,
            assignee_id: self.assignee_id,
            notes: validation::optional("notes", self.notes.as_deref(), 4000)?,
            due_date: self.due_date,
        })
    }

    /// Stage changes go through `move_card`, so `status` is ignored here.
    pub fn into_changes(self) -> Result<PipelineCardChanges, ValidationError> {
        Ok(PipelineCardChanges {
            event_id: self.event_id,
            package_id: self.package_id,
            athlete_name: self
                .athlete_name
                .map(|n| validation::required("athlete_name", &n, 120))
                .transpose()?,
            athlete_number: validation::optional("athlete_number", self.athlete_number.as_deref(), 20)?,
            assignee_id: self.assignee_id,
            notes: validation::optional("notes", self.notes.as_deref(), 4000)?,
            due_date: self.due_date,
            updated_at: Utc::now(),
        })
    }
}

/// Request body for moving a card between columns.
#[derive(Debug, Deserialize)]
pub struct MoveCardRequest {
    pub status: String,
    pub position: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order() {
        let mut stage = PipelineStage::Waiting;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen, PipelineStage::ALL.to_vec());
        assert_eq!(PipelineStage::Delivered.next(), None);
    }

    #[test]
    fn stage_parsing_is_case_insensitive() {
        assert_eq!("editing".parse::<PipelineStage>().unwrap(), PipelineStage::Editing);
        assert_eq!(" READY ".parse::<PipelineStage>().unwrap(), PipelineStage::Ready);
        assert!("ARCHIVED".parse::<PipelineStage>().is_err());
    }

    #[test]
    fn stage_serializes_uppercase() {
        let json = serde_json::to_string(&PipelineStage::Shooting).unwrap();
        assert_eq!(json, "\"SHOOTING\"");
        let stage: PipelineStage = serde_json::from_str("\"DELIVERED\"").unwrap();
        assert_eq!(stage, PipelineStage::Delivered);
    }

    #[test]
    fn new_card_starts_waiting() {
        let form = CardForm {
            athlete_name: Some("J. Cutler".into()),
            athlete_number: Some("112".into()),
            ..Default::default()
        };
        let card = form.into_new().unwrap();
        assert_eq!(card.status, "WAITING");
        assert_eq!(card.athlete_number.as_deref(), Some("112"));
    }

    #[test]
    fn new_card_stage_is_case_insensitive() {
        let form: CardForm =
            serde_json::from_str(r#"{"athlete_name":"Kim","status":"editing"}"#).unwrap();
        assert_eq!(form.into_new().unwrap().status, "EDITING");

        let form: CardForm =
            serde_json::from_str(r#"{"athlete_name":"Kim","status":"archived"}"#).unwrap();
        assert!(matches!(
            form.into_new(),
            Err(ValidationError::InvalidVariant { field: "status", .. })
        ));
    }
}
