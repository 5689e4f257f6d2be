//! Order persistence for verified payments.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::order::{NewOrder, Order};
use crate::schema::{events, orders, packages, profiles};

/// Clear package, event and profile ids that point at no row.
///
/// Checkout metadata is written by the storefront and may name a package
/// that was since deleted or a customer who never signed in to the
/// dashboard; the order is still recorded, just without the link.
pub async fn drop_unknown_references(
    conn: &mut AsyncPgConnection,
    new_order: &mut NewOrder,
) -> anyhow::Result<()> {
    if let Some(package_id) = new_order.package_id {
        let found: bool = diesel::select(diesel::dsl::exists(packages::table.find(package_id)))
            .get_result(conn)
            .await?;
        if !found {
            tracing::warn!(package_id, "Order metadata names an unknown package, dropping it");
            new_order.package_id = None;
        }
    }

    if let Some(event_id) = new_order.event_id {
        let found: bool = diesel::select(diesel::dsl::exists(events::table.find(event_id)))
            .get_result(conn)
            .await?;
        if !found {
            tracing::warn!(event_id, "Order metadata names an unknown event, dropping it");
            new_order.event_id = None;
        }
    }

    if let Some(profile_id) = new_order.profile_id {
        let found: bool = diesel::select(diesel::dsl::exists(profiles::table.find(profile_id)))
            .get_result(conn)
            .await?;
        if !found {
            tracing::warn!(%profile_id, "Order metadata names an unknown profile, dropping it");
            new_order.profile_id = None;
        }
    }
    Ok(())
}

/// Insert an order unless one with the same gateway order id exists.
///
/// Returns `None` for a duplicate delivery; the unique constraint makes
/// concurrent deliveries of the same webhook resolve to one row.
pub async fn insert_if_absent(
    conn: &mut AsyncPgConnection,
    new_order: NewOrder,
) -> anyhow::Result<Option<Order>> {
    let result = diesel::insert_into(orders::table)
        .values(&new_order)
        .on_conflict(orders::gateway_order_id)
        .do_nothing()
        .returning(Order::as_returning())
        .get_result(conn)
        .await
        .optional()?;

    match &result {
        Some(order) => {
            crate::metrics::order_created();
            tracing::info!(
                order_id = order.id,
                gateway_order_id = %order.gateway_order_id,
                amount_cents = order.amount_cents,
                "Order created"
            );
        }
        None => tracing::info!(
            gateway_order_id = %new_order.gateway_order_id,
            "Duplicate order ignored"
        ),
    }
    Ok(result)
}

pub async fn list_orders(conn: &mut AsyncPgConnection, limit: i64) -> anyhow::Result<Vec<Order>> {
    let results = orders::table
        .order(orders::id.desc())
        .limit(limit)
        .select(Order::as_select())
        .load(conn)
        .await?;
    Ok(results)
}

pub async fn get_order(conn: &mut AsyncPgConnection, order_id: i64) -> anyhow::Result<Option<Order>> {
    let result = orders::table
        .find(order_id)
        .select(Order::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}
