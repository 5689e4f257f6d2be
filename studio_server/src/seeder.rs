//! Studio seeder — default settings, legal documents and starter FAQs.
//!
//! Idempotent: settings use ON CONFLICT DO NOTHING, legal documents are
//! only seeded for types with no document, FAQs only into an empty table.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::faq::NewFaq;
use crate::models::legal::{LegalDocType, NewLegalDocument};
use crate::models::setting::{UpsertSetting, DEFAULT_SETTINGS};
use crate::schema::{faqs, legal_documents, settings};

const STARTER_FAQS: [(&str, &str, &str); 3] = [
    (
        "When will I receive my footage?",
        "Edited footage is usually delivered within 14 days of the competition. \
         You will get a download link as soon as it is ready.",
        "delivery",
    ),
    (
        "How long do download links stay valid?",
        "Download links stay active for at least 30 days. Contact us if a link has expired.",
        "delivery",
    ),
    (
        "Can I cancel my order?",
        "Orders can be cancelled for a full refund before the event date. \
         See the refund policy for details.",
        "orders",
    ),
];

pub async fn seed_studio(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    let defaults: Vec<UpsertSetting> = DEFAULT_SETTINGS
        .iter()
        .map(|(key, value)| UpsertSetting {
            key: key.to_string(),
            value: serde_json::Value::String(value.to_string()),
            description: None,
        })
        .collect();

    let inserted = diesel::insert_into(settings::table)
        .values(&defaults)
        .on_conflict(settings::key)
        .do_nothing()
        .execute(conn)
        .await?;

    let mut legal_inserted = 0;
    for doc_type in LegalDocType::ALL {
        let existing: i64 = legal_documents::table
            .filter(legal_documents::doc_type.eq(doc_type.as_str()))
            .count()
            .get_result(conn)
            .await?;
        if existing > 0 {
            continue;
        }
        legal_inserted += diesel::insert_into(legal_documents::table)
            .values(&NewLegalDocument {
                doc_type: doc_type.as_str().to_string(),
                title: doc_type.default_title().to_string(),
                body: doc_type.default_body().to_string(),
                version: "1.0".to_string(),
                is_active: true,
            })
            .execute(conn)
            .await?;
    }

    let faq_count: i64 = faqs::table.count().get_result(conn).await?;
    let mut faqs_inserted = 0;
    if faq_count == 0 {
        let starter: Vec<NewFaq> = STARTER_FAQS
            .iter()
            .enumerate()
            .map(|(i, (question, answer, category))| NewFaq {
                question: question.to_string(),
                answer: answer.to_string(),
                category: Some(category.to_string()),
                display_order: i as i32,
                published: true,
            })
            .collect();
        faqs_inserted = diesel::insert_into(faqs::table)
            .values(&starter)
            .execute(conn)
            .await?;
    }

    tracing::info!(
        settings = inserted,
        legal_documents = legal_inserted,
        faqs = faqs_inserted,
        "Studio seed data applied"
    );
    Ok(())
}
