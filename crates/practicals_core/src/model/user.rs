//! Signed-in user record.
//!
//! Authentication itself happens outside the store; this record only keeps
//! the profile the identity provider returned.

use super::validation::{require_email, require_text};
use super::{text, FieldValue, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            display_name: String::new(),
        }
    }
}

impl Record for User {
    const KIND: &'static str = "user";
    const FIELDS: &'static [&'static str] = &["username", "email", "display_name"];

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
        require_text(Self::KIND, "username", &self.username)?;
        require_text(Self::KIND, "email", &self.email)?;
        require_email(Self::KIND, "email", &self.email)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "username" => text(&self.username),
            "email" => text(&self.email),
            "display_name" => text(&self.display_name),
            _ => None,
        }
    }
}
