//! Book catalog record.

use super::validation::{require_non_negative, require_text};
use super::{text, FieldValue, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub title: String,
    pub author: String,
    /// Optional; blank when unknown.
    #[serde(default)]
    pub isbn: String,
    pub price: f64,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            isbn: String::new(),
            price,
        }
    }
}

impl Record for Book {
    const KIND: &'static str = "book";
    const FIELDS: &'static [&'static str] = &["title", "author", "isbn", "price"];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn with_id(&self, id: RecordId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "title", &self.title)?;
        require_text(Self::KIND, "author", &self.author)?;
        require_non_negative(Self::KIND, "price", self.price)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => text(&self.title),
            "author" => text(&self.author),
            "isbn" => text(&self.isbn),
            "price" => Some(FieldValue::Number(self.price)),
            _ => None,
        }
    }
}
