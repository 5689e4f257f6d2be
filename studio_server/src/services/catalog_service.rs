//! Packages and events — the storefront catalog.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::event::{Event, EventChanges, NewEvent};
use crate::models::package::{NewPackage, Package, PackageChanges};
use crate::schema::{events, packages};

// ── Packages ──

/// All packages, or only active ones for the public site.
pub async fn list_packages(
    conn: &mut AsyncPgConnection,
    active_only: bool,
) -> anyhow::Result<Vec<Package>> {
    let mut query = packages::table
        .order((packages::display_order.asc(), packages::id.asc()))
        .select(Package::as_select())
        .into_boxed();
    if active_only {
        query = query.filter(packages::active.eq(true));
    }
    Ok(query.load(conn).await?)
}

pub async fn get_package(
    conn: &mut AsyncPgConnection,
    package_id: i64,
) -> anyhow::Result<Option<Package>> {
    let result = packages::table
        .find(package_id)
        .select(Package::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn create_package(
    conn: &mut AsyncPgConnection,
    new_package: NewPackage,
) -> anyhow::Result<Package> {
    let result = diesel::insert_into(packages::table)
        .values(&new_package)
        .returning(Package::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(package_id = result.id, name = %result.name, "Package created");
    Ok(result)
}

pub async fn update_package(
    conn: &mut AsyncPgConnection,
    package_id: i64,
    changes: PackageChanges,
) -> anyhow::Result<Option<Package>> {
    let result = diesel::update(packages::table.find(package_id))
        .set(&changes)
        .returning(Package::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn delete_package(conn: &mut AsyncPgConnection, package_id: i64) -> anyhow::Result<bool> {
    let deleted = diesel::delete(packages::table.find(package_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

// ── Events ──

pub async fn list_events(conn: &mut AsyncPgConnection) -> anyhow::Result<Vec<Event>> {
    let results = events::table
        .order((events::event_date.desc(), events::id.desc()))
        .select(Event::as_select())
        .load(conn)
        .await?;
    Ok(results)
}

/// Active upcoming events on or after `today`, soonest first.
pub async fn list_upcoming_events(
    conn: &mut AsyncPgConnection,
    today: NaiveDate,
) -> anyhow::Result<Vec<Event>> {
    let results = events::table
        .filter(events::active.eq(true))
        .filter(events::status.eq("upcoming"))
        .filter(events::event_date.ge(today))
        .order((events::event_date.asc(), events::id.asc()))
        .select(Event::as_select())
        .load(conn)
        .await?;
    Ok(results)
}

pub async fn get_event(conn: &mut AsyncPgConnection, event_id: i64) -> anyhow::Result<Option<Event>> {
    let result = events::table
        .find(event_id)
        .select(Event::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn create_event(conn: &mut AsyncPgConnection, new_event: NewEvent) -> anyhow::Result<Event> {
    let result = diesel::insert_into(events::table)
        .values(&new_event)
        .returning(Event::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(event_id = result.id, date = %result.event_date, "Event created");
    Ok(result)
}

pub async fn update_event(
    conn: &mut AsyncPgConnection,
    event_id: i64,
    changes: EventChanges,
) -> anyhow::Result<Option<Event>> {
    let result = diesel::update(events::table.find(event_id))
        .set(&changes)
        .returning(Event::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn delete_event(conn: &mut AsyncPgConnection, event_id: i64) -> anyhow::Result<bool> {
    let deleted = diesel::delete(events::table.find(event_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}
