//! Guestbook entry record.

use super::validation::require_text;
use super::{text, FieldValue, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    pub message: String,
}

impl GuestbookEntry {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            message: message.into(),
        }
    }
}

impl Record for GuestbookEntry {
    const KIND: &'static str = "guestbook_entry";
    const FIELDS: &'static [&'static str] = &["name", "message"];

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
        require_text(Self::KIND, "name", &self.name)?;
        require_text(Self::KIND, "message", &self.message)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => text(&self.name),
            "message" => text(&self.message),
            _ => None,
        }
    }
}
