//! legal_documents — Versioned terms, privacy and refund policies.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::validation::{self, ValidationError};
use crate::schema::legal_documents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalDocType {
    Terms,
    Privacy,
    Refund,
}

impl LegalDocType {
    pub const ALL: [LegalDocType; 3] = [LegalDocType::Terms, LegalDocType::Privacy, LegalDocType::Refund];

    pub fn as_str(self) -> &'static str {
        match self {
            LegalDocType::Terms => "terms",
            LegalDocType::Privacy => "privacy",
            LegalDocType::Refund => "refund",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            LegalDocType::Terms => "Terms of Service",
            LegalDocType::Privacy => "Privacy Policy",
            LegalDocType::Refund => "Refund Policy",
        }
    }

    /// Text served when no active document exists or the lookup fails.
    pub fn default_body(self) -> &'static str {
        match self {
            LegalDocType::Terms => {
                "These terms are being updated. Please contact us for the current terms of service."
            }
            LegalDocType::Privacy => {
                "Our privacy policy is being updated. Personal information is only used to \
                 fulfil and deliver your order. Please contact us with any questions."
            }
            LegalDocType::Refund => {
                "Orders may be cancelled for a full refund before the event date. \
                 Please contact us for refunds after footage has been delivered."
            }
        }
    }
}

impl FromStr for LegalDocType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terms" => Ok(LegalDocType::Terms),
            "privacy" => Ok(LegalDocType::Privacy),
            "refund" => Ok(LegalDocType::Refund),
            _ => Err(ValidationError::InvalidVariant {
                field: "doc_type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = legal_documents)]
pub struct LegalDocument {
    pub id: i64,
    pub doc_type: String,
    pub title: String,
    pub body: String,
    pub version: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = legal_documents)]
pub struct NewLegalDocument {
    pub doc_type: String,
    pub title: String,
    pub body: String,
    pub version: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct LegalDocumentForm {
    pub doc_type: String,
    pub title: Option<String>,
    pub body: String,
    pub version: String,
}

impl LegalDocumentForm {
    /// New documents are inactive until explicitly activated.
    pub fn into_new(self) -> Result<NewLegalDocument, ValidationError> {
        let doc_type: LegalDocType = self.doc_type.parse()?;
        let title = match self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => validation::required("title", t, 200)?,
            None => doc_type.default_title().to_string(),
        };
        Ok(NewLegalDocument {
            doc_type: doc_type.as_str().to_string(),
            title,
            body: validation::required("body", &self.body, 100_000)?,
            version: validation::required("version", &self.version, 20)?,
            is_active: false,
        })
    }
}

/// Response for the public legal page, whether stored or fallback.
#[derive(Debug, Clone, Serialize)]
pub struct LegalPage {
    pub doc_type: LegalDocType,
    pub title: String,
    pub body: String,
    pub version: Option<String>,
    pub is_default: bool,
}

impl LegalPage {
    pub fn fallback(doc_type: LegalDocType) -> Self {
        Self {
            doc_type,
            title: doc_type.default_title().to_string(),
            body: doc_type.default_body().to_string(),
            version: None,
            is_default: true,
        }
    }

    pub fn from_document(doc_type: LegalDocType, doc: LegalDocument) -> Self {
        Self {
            doc_type,
            title: doc.title,
            body: doc.body,
            version: Some(doc.version),
            is_default: false,
        }
    }
}
