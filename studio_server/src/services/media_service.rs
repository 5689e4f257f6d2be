//! Portfolio and showcase items.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::media::{
    NewPortfolioItem, NewShowcaseItem, PortfolioItem, PortfolioItemChanges, ShowcaseItem,
    ShowcaseItemChanges,
};
use crate::schema::{portfolio_items, showcase_items};

/// Listing filters; the public site always sets `published_only`.
#[derive(Debug, Default, Clone)]
pub struct MediaFilter {
    pub published_only: bool,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

// ── Portfolio ──

pub async fn list_portfolio(
    conn: &mut AsyncPgConnection,
    filter: &MediaFilter,
) -> anyhow::Result<Vec<PortfolioItem>> {
    let mut query = portfolio_items::table
        .order((portfolio_items::display_order.asc(), portfolio_items::id.asc()))
        .select(PortfolioItem::as_select())
        .into_boxed();
    if filter.published_only {
        query = query.filter(portfolio_items::published.eq(true));
    }
    if let Some(category) = &filter.category {
        query = query.filter(portfolio_items::category.eq(category.to_lowercase()));
    }
    Ok(query.load(conn).await?)
}

pub async fn create_portfolio_item(
    conn: &mut AsyncPgConnection,
    new_item: NewPortfolioItem,
) -> anyhow::Result<PortfolioItem> {
    let result = diesel::insert_into(portfolio_items::table)
        .values(&new_item)
        .returning(PortfolioItem::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(item_id = result.id, category = %result.category, "Portfolio item created");
    Ok(result)
}

pub async fn update_portfolio_item(
    conn: &mut AsyncPgConnection,
    item_id: i64,
    changes: PortfolioItemChanges,
) -> anyhow::Result<Option<PortfolioItem>> {
    let result = diesel::update(portfolio_items::table.find(item_id))
        .set(&changes)
        .returning(PortfolioItem::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn delete_portfolio_item(conn: &mut AsyncPgConnection, item_id: i64) -> anyhow::Result<bool> {
    let deleted = diesel::delete(portfolio_items::table.find(item_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

// ── Showcase ──

pub async fn list_showcase(
    conn: &mut AsyncPgConnection,
    filter: &MediaFilter,
) -> anyhow::Result<Vec<ShowcaseItem>> {
    let mut query = showcase_items::table
        .order((showcase_items::display_order.asc(), showcase_items::id.asc()))
        .select(ShowcaseItem::as_select())
        .into_boxed();
    if filter.published_only {
        query = query.filter(showcase_items::published.eq(true));
    }
    if let Some(category) = &filter.category {
        query = query.filter(showcase_items::category.eq(category.to_lowercase()));
    }
    if let Some(featured) = filter.featured {
        query = query.filter(showcase_items::featured.eq(featured));
    }
    Ok(query.load(conn).await?)
}

pub async fn create_showcase_item(
    conn: &mut AsyncPgConnection,
    new_item: NewShowcaseItem,
) -> anyhow::Result<ShowcaseItem> {
    let result = diesel::insert_into(showcase_items::table)
        .values(&new_item)
        .returning(ShowcaseItem::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(item_id = result.id, featured = result.featured, "Showcase item created");
    Ok(result)
}

pub async fn update_showcase_item(
    conn: &mut AsyncPgConnection,
    item_id: i64,
    changes: ShowcaseItemChanges,
) -> anyhow::Result<Option<ShowcaseItem>> {
    let result = diesel::update(showcase_items::table.find(item_id))
        .set(&changes)
        .returning(ShowcaseItem::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn delete_showcase_item(conn: &mut AsyncPgConnection, item_id: i64) -> anyhow::Result<bool> {
    let deleted = diesel::delete(showcase_items::table.find(item_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}
