//! FAQ entries for the support pages.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::faq::{Faq, FaqChanges, NewFaq};
use crate::schema::faqs;

pub async fn list_faqs(conn: &mut AsyncPgConnection, published_only: bool) -> anyhow::Result<Vec<Faq>> {
    let mut query = faqs::table
        .order((faqs::display_order.asc(), faqs::id.asc()))
        .select(Faq::as_select())
        .into_boxed();
    if published_only {
        query = query.filter(faqs::published.eq(true));
    }
    Ok(query.load(conn).await?)
}

pub async fn create_faq(conn: &mut AsyncPgConnection, new_faq: NewFaq) -> anyhow::Result<Faq> {
    let result = diesel::insert_into(faqs::table)
        .values(&new_faq)
        .returning(Faq::as_returning())
        .get_result(conn)
        .await?;
    Ok(result)
}

pub async fn update_faq(
    conn: &mut AsyncPgConnection,
    faq_id: i64,
    changes: FaqChanges,
) -> anyhow::Result<Option<Faq>> {
    let result = diesel::update(faqs::table.find(faq_id))
        .set(&changes)
        .returning(Faq::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn delete_faq(conn: &mut AsyncPgConnection, faq_id: i64) -> anyhow::Result<bool> {
    let deleted = diesel::delete(faqs::table.find(faq_id)).execute(conn).await?;
    Ok(deleted > 0)
}
