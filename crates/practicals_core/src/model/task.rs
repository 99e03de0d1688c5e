//! Task manager record.
//!
//! # Invariants
//! - `title` is required.
//! - `assignee_email` is either blank or a valid address; a reminder is
//!   only sent when it is set.
//! - `priority` is finite.

use super::validation::{require_email, require_finite, require_text};
use super::{text, FieldValue, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee_email: String,
    #[serde(default)]
    pub priority: f64,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            assignee_email: String::new(),
            priority: 0.0,
        }
    }

    /// Returns the trimmed assignee address, if one is set.
    pub fn assignee(&self) -> Option<&str> {
        let trimmed = self.assignee_email.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

impl Record for Task {
    const KIND: &'static str = "task";
    const FIELDS: &'static [&'static str] = &["title", "description", "assignee_email", "priority"];

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
        if let Some(email) = self.assignee() {
            require_email(Self::KIND, "assignee_email", email)?;
        }
        require_finite(Self::KIND, "priority", self.priority)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => text(&self.title),
            "description" => text(&self.description),
            "assignee_email" => text(&self.assignee_email),
            "priority" => Some(FieldValue::Number(self.priority)),
            _ => None,
        }
    }
}
