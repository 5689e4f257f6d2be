//! Deliverable CRUD and download auditing.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::models::deliverable::{
    Deliverable, DeliverableChanges, DownloadLog, NewDeliverable, NewDownloadLog,
};
use crate::schema::{deliverables, download_logs};

pub async fn list_deliverables(conn: &mut AsyncPgConnection) -> anyhow::Result<Vec<Deliverable>> {
    let results = deliverables::table
        .order(deliverables::id.desc())
        .select(Deliverable::as_select())
        .load(conn)
        .await?;
    Ok(results)
}

pub async fn get_deliverable(
    conn: &mut AsyncPgConnection,
    deliverable_id: i64,
) -> anyhow::Result<Option<Deliverable>> {
    let result = deliverables::table
        .find(deliverable_id)
        .select(Deliverable::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn create_deliverable(
    conn: &mut AsyncPgConnection,
    new_deliverable: NewDeliverable,
) -> anyhow::Result<Deliverable> {
    let result = diesel::insert_into(deliverables::table)
        .values(&new_deliverable)
        .returning(Deliverable::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(
        deliverable_id = result.id,
        card_id = ?result.card_id,
        "Deliverable created"
    );
    Ok(result)
}

pub async fn update_deliverable(
    conn: &mut AsyncPgConnection,
    deliverable_id: i64,
    changes: DeliverableChanges,
) -> anyhow::Result<Option<Deliverable>> {
    let result = diesel::update(deliverables::table.find(deliverable_id))
        .set(&changes)
        .returning(Deliverable::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn delete_deliverable(
    conn: &mut AsyncPgConnection,
    deliverable_id: i64,
) -> anyhow::Result<bool> {
    let deleted = diesel::delete(deliverables::table.find(deliverable_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

/// Write the audit row and bump the counter in one transaction.
pub async fn record_download(
    conn: &mut AsyncPgConnection,
    deliverable_id: i64,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> anyhow::Result<()> {
    let log = NewDownloadLog {
        deliverable_id,
        ip_address,
        user_agent,
    };
    conn.transaction::<_, diesel::result::Error, _>(move |conn| {
        async move {
            diesel::insert_into(download_logs::table)
                .values(&log)
                .execute(conn)
                .await?;

            diesel::update(deliverables::table.find(deliverable_id))
                .set((
                    deliverables::download_count.eq(deliverables::download_count + 1),
                    deliverables::updated_at.eq(Utc::now()),
                ))
                .execute(conn)
                .await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    crate::metrics::deliverable_downloaded();
    Ok(())
}

pub async fn recent_downloads(
    conn: &mut AsyncPgConnection,
    deliverable_id: i64,
    limit: i64,
) -> anyhow::Result<Vec<DownloadLog>> {
    let results = download_logs::table
        .filter(download_logs::deliverable_id.eq(deliverable_id))
        .order(download_logs::downloaded_at.desc())
        .limit(limit)
        .select(DownloadLog::as_select())
        .load(conn)
        .await?;
    Ok(results)
}
