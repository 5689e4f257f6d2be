//! Legal documents — versioned, with a single active document per type.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::models::legal::{LegalDocType, LegalDocument, LegalPage, NewLegalDocument};
use crate::schema::legal_documents;

pub async fn list_documents(
    conn: &mut AsyncPgConnection,
    doc_type: Option<LegalDocType>,
) -> anyhow::Result<Vec<LegalDocument>> {
    let mut query = legal_documents::table
        .order((legal_documents::doc_type.asc(), legal_documents::id.desc()))
        .select(LegalDocument::as_select())
        .into_boxed();
    if let Some(doc_type) = doc_type {
        query = query.filter(legal_documents::doc_type.eq(doc_type.as_str()));
    }
    Ok(query.load(conn).await?)
}

pub async fn create_document(
    conn: &mut AsyncPgConnection,
    new_doc: NewLegalDocument,
) -> anyhow::Result<LegalDocument> {
    let result = diesel::insert_into(legal_documents::table)
        .values(&new_doc)
        .returning(LegalDocument::as_returning())
        .get_result(conn)
        .await?;
    tracing::info!(
        document_id = result.id,
        doc_type = %result.doc_type,
        version = %result.version,
        "Legal document created"
    );
    Ok(result)
}

/// Make `document_id` the active document of its type.
///
/// Runs in one transaction: the other documents of the type are
/// deactivated first so the partial unique index never sees two active rows.
pub async fn activate_document(
    conn: &mut AsyncPgConnection,
    document_id: i64,
) -> anyhow::Result<Option<LegalDocument>> {
    let result = conn
        .transaction::<_, diesel::result::Error, _>(move |conn| {
            async move {
                let doc_type: Option<String> = legal_documents::table
                    .find(document_id)
                    .select(legal_documents::doc_type)
                    .first(conn)
                    .await
                    .optional()?;
                let Some(doc_type) = doc_type else {
                    return Ok(None);
                };
                let now = Utc::now();

                diesel::update(
                    legal_documents::table
                        .filter(legal_documents::doc_type.eq(&doc_type))
                        .filter(legal_documents::id.ne(document_id))
                        .filter(legal_documents::is_active.eq(true)),
                )
                .set((
                    legal_documents::is_active.eq(false),
                    legal_documents::updated_at.eq(now),
                ))
                .execute(conn)
                .await?;

                diesel::update(legal_documents::table.find(document_id))
                    .set((
                        legal_documents::is_active.eq(true),
                        legal_documents::updated_at.eq(now),
                    ))
                    .returning(LegalDocument::as_returning())
                    .get_result(conn)
                    .await
                    .map(Some)
            }
            .scope_boxed()
        })
        .await?;

    if let Some(doc) = &result {
        tracing::info!(
            document_id = doc.id,
            doc_type = %doc.doc_type,
            version = %doc.version,
            "Legal document activated"
        );
    }
    Ok(result)
}

pub async fn active_document(
    conn: &mut AsyncPgConnection,
    doc_type: LegalDocType,
) -> anyhow::Result<Option<LegalDocument>> {
    let result = legal_documents::table
        .filter(legal_documents::doc_type.eq(doc_type.as_str()))
        .filter(legal_documents::is_active.eq(true))
        .select(LegalDocument::as_select())
        .first(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Public page text: the active document, or the built-in default when
/// none is active or the lookup fails.
pub async fn public_page(conn: &mut AsyncPgConnection, doc_type: LegalDocType) -> LegalPage {
    match active_document(conn, doc_type).await {
        Ok(Some(doc)) => LegalPage::from_document(doc_type, doc),
        Ok(None) => {
            tracing::warn!(doc_type = doc_type.as_str(), "No active legal document, using default text");
            LegalPage::fallback(doc_type)
        }
        Err(e) => {
            tracing::error!(doc_type = doc_type.as_str(), "Failed to load legal document: {e}");
            LegalPage::fallback(doc_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_connection;

    fn draft(version: &str) -> NewLegalDocument {
        NewLegalDocument {
            doc_type: LegalDocType::Refund.as_str().to_string(),
            title: "Refund policy".into(),
            body: format!("Refund terms {version}"),
            version: version.into(),
            is_active: false,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn activation_leaves_one_active_document() {
        let mut conn = test_connection().await;
        let v1 = create_document(&mut conn, draft("1.0")).await.unwrap();
        let v2 = create_document(&mut conn, draft("2.0")).await.unwrap();

        activate_document(&mut conn, v1.id).await.unwrap();
        activate_document(&mut conn, v2.id).await.unwrap();

        let active = active_document(&mut conn, LegalDocType::Refund).await.unwrap();
        assert_eq!(active.map(|d| d.id), Some(v2.id));

        let page = public_page(&mut conn, LegalDocType::Refund).await;
        assert!(!page.is_default);
        assert_eq!(page.version.as_deref(), Some("2.0"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn activating_missing_document_is_none() {
        let mut conn = test_connection().await;
        assert!(activate_document(&mut conn, i64::MAX).await.unwrap().is_none());
    }
}
