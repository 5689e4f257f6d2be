//! Kanban board reads and card writes.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

use crate::models::pipeline::{
    NewPipelineCard, PipelineCard, PipelineCardChanges, PipelineStage,
};
use crate::schema::pipeline_cards;

/// One board column.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub stage: PipelineStage,
    pub cards: Vec<PipelineCard>,
}

/// Split cards into the five stage columns, preserving input order.
pub fn group_board(cards: Vec<PipelineCard>) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = PipelineStage::ALL
        .into_iter()
        .map(|stage| BoardColumn {
            stage,
            cards: Vec::new(),
        })
        .collect();
    for card in cards {
        let stage = card.stage();
        if let Some(column) = columns.iter_mut().find(|c| c.stage == stage) {
            column.cards.push(card);
        }
    }
    columns
}

pub async fn board(conn: &mut AsyncPgConnection) -> anyhow::Result<Vec<BoardColumn>> {
    let cards = pipeline_cards::table
        .order((pipeline_cards::position.asc(), pipeline_cards::id.asc()))
        .select(PipelineCard::as_select())
        .load(conn)
        .await?;
    Ok(group_board(cards))
}

pub async fn get_card(
    conn: &mut AsyncPgConnection,
    card_id: i64,
) -> anyhow::Result<Option<PipelineCard>> {
    let result = pipeline_cards::table
        .find(card_id)
        .select(PipelineCard::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Next free position at the bottom of a column.
async fn next_position(conn: &mut AsyncPgConnection, stage: PipelineStage) -> anyhow::Result<i32> {
    let max: Option<i32> = pipeline_cards::table
        .filter(pipeline_cards::status.eq(stage.as_str()))
        .select(diesel::dsl::max(pipeline_cards::position))
        .first(conn)
        .await?;
    Ok(max.map_or(0, |p| p + 1))
}

pub async fn create_card(
    conn: &mut AsyncPgConnection,
    mut new_card: NewPipelineCard,
) -> anyhow::Result<PipelineCard> {
    let stage = new_card.status.parse().unwrap_or(PipelineStage::Waiting);
    new_card.position = next_position(conn, stage).await?;

    let card = diesel::insert_into(pipeline_cards::table)
        .values(&new_card)
        .returning(PipelineCard::as_returning())
        .get_result(conn)
        .await?;

    tracing::info!(
        card_id = card.id,
        order_id = ?card.order_id,
        status = %card.status,
        "Pipeline card created"
    );
    Ok(card)
}

pub async fn update_card(
    conn: &mut AsyncPgConnection,
    card_id: i64,
    changes: PipelineCardChanges,
) -> anyhow::Result<Option<PipelineCard>> {
    let result = diesel::update(pipeline_cards::table.find(card_id))
        .set(&changes)
        .returning(PipelineCard::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Move a card to `stage`. Without a position the card goes to the bottom
/// of the target column. Entering DELIVERED stamps `delivered_at`, moving
/// within DELIVERED keeps the first stamp, and leaving it clears the stamp.
pub async fn move_card(
    conn: &mut AsyncPgConnection,
    card_id: i64,
    stage: PipelineStage,
    position: Option<i32>,
) -> anyhow::Result<Option<PipelineCard>> {
    let Some(current) = get_card(conn, card_id).await? else {
        return Ok(None);
    };
    let position = match position {
        Some(p) => p.max(0),
        None => next_position(conn, stage).await?,
    };
    let now = Utc::now();
    let delivered_at = match stage {
        PipelineStage::Delivered => current.delivered_at.or(Some(now)),
        _ => None,
    };

    let result = diesel::update(pipeline_cards::table.find(card_id))
        .set((
            pipeline_cards::status.eq(stage.as_str()),
            pipeline_cards::position.eq(position),
            pipeline_cards::delivered_at.eq(delivered_at),
            pipeline_cards::updated_at.eq(now),
        ))
        .returning(PipelineCard::as_returning())
        .get_result(conn)
        .await
        .optional()?;

    if let Some(card) = &result {
        crate::metrics::card_moved(stage.as_str());
        tracing::info!(card_id = card.id, status = %stage, position, "Pipeline card moved");
    }
    Ok(result)
}

/// Outcome of advancing a card one stage.
#[derive(Debug)]
pub enum Advance {
    Moved(PipelineCard),
    AlreadyDelivered,
    Missing,
}

/// Move a card to the stage after its current one.
pub async fn advance_card(conn: &mut AsyncPgConnection, card_id: i64) -> anyhow::Result<Advance> {
    let Some(card) = get_card(conn, card_id).await? else {
        return Ok(Advance::Missing);
    };
    let Some(next) = card.stage().next() else {
        return Ok(Advance::AlreadyDelivered);
    };
    Ok(match move_card(conn, card_id, next, None).await? {
        Some(card) => Advance::Moved(card),
        None => Advance::Missing,
    })
}

pub async fn delete_card(conn: &mut AsyncPgConnection, card_id: i64) -> anyhow::Result<bool> {
    let deleted = diesel::delete(pipeline_cards::table.find(card_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}
