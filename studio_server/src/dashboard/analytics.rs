//! Aggregate queries behind the analytics dashboard.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

use crate::models::pipeline::PipelineStage;

pub const DEFAULT_DAYS: i32 = 30;
const MAX_DAYS: i32 = 365;

/// Clamp a requested window to 1..=365 days.
pub fn clamp_days(days: Option<i32>) -> i32 {
    days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS)
}

/// Paid revenue over N days.
#[derive(Debug, Serialize, QueryableByName)]
pub struct RevenueSummary {
    #[diesel(sql_type = BigInt)]
    pub orders: i64,
    #[diesel(sql_type = BigInt)]
    pub revenue_cents: i64,
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_order_cents: Option<f64>,
}

pub async fn query_revenue_summary(
    conn: &mut AsyncPgConnection,
    days: i32,
) -> anyhow::Result<RevenueSummary> {
    let result = diesel::sql_query(
        "SELECT \
            COUNT(*) AS orders, \
            COALESCE(SUM(amount_cents), 0)::bigint AS revenue_cents, \
            AVG(amount_cents)::float8 AS avg_order_cents \
         FROM orders \
         WHERE status = 'DONE' \
           AND created_at >= NOW() - make_interval(days => $1)",
    )
    .bind::<Integer, _>(days)
    .get_result(conn)
    .await?;
    Ok(result)
}

/// Revenue per calendar month.
#[derive(Debug, Serialize, QueryableByName)]
pub struct RevenueByMonth {
    #[diesel(sql_type = Text)]
    pub month: String,
    #[diesel(sql_type = BigInt)]
    pub orders: i64,
    #[diesel(sql_type = BigInt)]
    pub revenue_cents: i64,
}

pub async fn query_revenue_by_month(
    conn: &mut AsyncPgConnection,
    months: i32,
) -> anyhow::Result<Vec<RevenueByMonth>> {
    let results = diesel::sql_query(
        "SELECT \
            to_char(date_trunc('month', created_at), 'YYYY-MM') AS month, \
            COUNT(*) AS orders, \
            COALESCE(SUM(amount_cents), 0)::bigint AS revenue_cents \
         FROM orders \
         WHERE status = 'DONE' \
           AND created_at >= date_trunc('month', NOW()) - make_interval(months => $1 - 1) \
         GROUP BY 1 \
         ORDER BY 1",
    )
    .bind::<Integer, _>(months.clamp(1, 36))
    .load(conn)
    .await?;
    Ok(results)
}

/// Orders grouped by package.
#[derive(Debug, Serialize, QueryableByName)]
pub struct OrdersByPackage {
    #[diesel(sql_type = Nullable<BigInt>)]
    pub package_id: Option<i64>,
    #[diesel(sql_type = Text)]
    pub package_name: String,
    #[diesel(sql_type = BigInt)]
    pub orders: i64,
    #[diesel(sql_type = BigInt)]
    pub revenue_cents: i64,
}

pub async fn query_orders_by_package(
    conn: &mut AsyncPgConnection,
    days: i32,
) -> anyhow::Result<Vec<OrdersByPackage>> {
    let results = diesel::sql_query(
        "SELECT \
            o.package_id, \
            COALESCE(p.name, 'Unassigned') AS package_name, \
            COUNT(*) AS orders, \
            COALESCE(SUM(o.amount_cents), 0)::bigint AS revenue_cents \
         FROM orders o \
         LEFT JOIN packages p ON p.id = o.package_id \
         WHERE o.status = 'DONE' \
           AND o.created_at >= NOW() - make_interval(days => $1) \
         GROUP BY o.package_id, p.name \
         ORDER BY orders DESC",
    )
    .bind::<Integer, _>(days)
    .load(conn)
    .await?;
    Ok(results)
}

/// Card count per pipeline stage.
#[derive(Debug, Serialize, QueryableByName)]
pub struct CardsByStage {
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// One entry per stage, in board order, zero-filled.
pub fn fill_stages(rows: Vec<CardsByStage>) -> Vec<CardsByStage> {
    PipelineStage::ALL
        .into_iter()
        .map(|stage| CardsByStage {
            status: stage.as_str().to_string(),
            count: rows
                .iter()
                .filter(|r| r.status == stage.as_str())
                .map(|r| r.count)
                .sum(),
        })
        .collect()
}

pub async fn query_cards_by_stage(conn: &mut AsyncPgConnection) -> anyhow::Result<Vec<CardsByStage>> {
    let rows: Vec<CardsByStage> = diesel::sql_query(
        "SELECT status, COUNT(*) AS count \
         FROM pipeline_cards \
         GROUP BY status",
    )
    .load(conn)
    .await?;
    Ok(fill_stages(rows))
}

/// Download redirects per day.
#[derive(Debug, Serialize, QueryableByName)]
pub struct DownloadsByDay {
    #[diesel(sql_type = Text)]
    pub day: String,
    #[diesel(sql_type = BigInt)]
    pub downloads: i64,
}

pub async fn query_downloads_by_day(
    conn: &mut AsyncPgConnection,
    days: i32,
) -> anyhow::Result<Vec<DownloadsByDay>> {
    let results = diesel::sql_query(
        "SELECT \
            to_char(date_trunc('day', downloaded_at), 'YYYY-MM-DD') AS day, \
            COUNT(*) AS downloads \
         FROM download_logs \
         WHERE downloaded_at >= NOW() - make_interval(days => $1) \
         GROUP BY 1 \
         ORDER BY 1",
    )
    .bind::<Integer, _>(days)
    .load(conn)
    .await?;
    Ok(results)
}

/// Headline numbers for the dashboard landing page.
#[derive(Debug, Serialize, QueryableByName)]
pub struct Overview {
    #[diesel(sql_type = BigInt)]
    pub cards_in_progress: i64,
    #[diesel(sql_type = BigInt)]
    pub cards_ready: i64,
    #[diesel(sql_type = BigInt)]
    pub upcoming_events: i64,
    #[diesel(sql_type = BigInt)]
    pub active_deliverables: i64,
    #[diesel(sql_type = BigInt)]
    pub downloads: i64,
    #[diesel(sql_type = BigInt)]
    pub orders: i64,
}

pub async fn query_overview(conn: &mut AsyncPgConnection, days: i32) -> anyhow::Result<Overview> {
    let result = diesel::sql_query(
        "SELECT \
            (SELECT COUNT(*) FROM pipeline_cards \
              WHERE status IN ('WAITING', 'SHOOTING', 'EDITING')) AS cards_in_progress, \
            (SELECT COUNT(*) FROM pipeline_cards WHERE status = 'READY') AS cards_ready, \
            (SELECT COUNT(*) FROM events \
              WHERE active AND status = 'upcoming' AND event_date >= CURRENT_DATE) AS upcoming_events, \
            (SELECT COUNT(*) FROM deliverables \
              WHERE active AND (expires_at IS NULL OR expires_at > NOW())) AS active_deliverables, \
            (SELECT COUNT(*) FROM download_logs \
              WHERE downloaded_at >= NOW() - make_interval(days => $1)) AS downloads, \
            (SELECT COUNT(*) FROM orders \
              WHERE status = 'DONE' AND created_at >= NOW() - make_interval(days => $1)) AS orders",
    )
    .bind::<Integer, _>(days)
    .get_result(conn)
    .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_are_clamped() {
        assert_eq!(clamp_days(None), 30);
        assert_eq!(clamp_days(Some(0)), 1);
        assert_eq!(clamp_days(Some(-7)), 1);
        assert_eq!(clamp_days(Some(9999)), 365);
        assert_eq!(clamp_days(Some(90)), 90);
    }

    #[test]
    fn stages_are_zero_filled_in_board_order() {
        let filled = fill_stages(vec![
            CardsByStage {
                status: "READY".into(),
                count: 4,
            },
            CardsByStage {
                status: "WAITING".into(),
                count: 2,
            },
        ]);
        let pairs: Vec<(&str, i64)> = filled.iter().map(|r| (r.status.as_str(), r.count)).collect();
        assert_eq!(
            pairs,
            vec![
                ("WAITING", 2),
                ("SHOOTING", 0),
                ("EDITING", 0),
                ("READY", 4),
                ("DELIVERED", 0),
            ]
        );
    }
}
