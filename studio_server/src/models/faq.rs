//! faqs — Support questions shown on the public site.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::validation::{self, ValidationError};
use crate::schema::faqs;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = faqs)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub display_order: i32,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = faqs)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub display_order: i32,
    pub published: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = faqs)]
pub struct FaqChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<i32>,
    pub published: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqForm {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<i32>,
    pub published: Option<bool>,
}

impl FaqForm {
    pub fn into_new(self) -> Result<NewFaq, ValidationError> {
        Ok(NewFaq {
            question: validation::required("question", self.question.as_deref().unwrap_or_default(), 500)?,
            answer: validation::required("answer", self.answer.as_deref().unwrap_or_default(), 10_000)?,
            category: validation::optional("category", self.category.as_deref(), 60)?,
            display_order: self.display_order.unwrap_or(0),
            published: self.published.unwrap_or(true),
        })
    }

    pub fn into_changes(self) -> Result<FaqChanges, ValidationError> {
        Ok(FaqChanges {
            question: self
                .question
                .map(|q| validation::required("question", &q, 500))
                .transpose()?,
            answer: self
                .answer
                .map(|a| validation::required("answer", &a, 10_000))
                .transpose()?,
            category: validation::optional("category", self.category.as_deref(), 60)?,
            display_order: self.display_order,
            published: self.published,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_requires_question_and_answer() {
        let form = FaqForm {
            question: Some("When do I get my video?".into()),
            ..Default::default()
        };
        assert_eq!(
            form.into_new().unwrap_err(),
            ValidationError::Empty { field: "answer" }
        );
    }
}
