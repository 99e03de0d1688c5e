//! Employee record.
//!
//! # Invariants
//! - Names and department are required.
//! - `salary` is finite and not negative.

use super::validation::{require_non_negative, require_text};
use super::{text, FieldValue, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub salary: f64,
}

impl Employee {
    /// Creates an unsaved employee.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            salary,
        }
    }
}

impl Record for Employee {
    const KIND: &'static str = "employee";
    const FIELDS: &'static [&'static str] = &["first_name", "last_name", "department", "salary"];

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
        require_text(Self::KIND, "first_name", &self.first_name)?;
        require_text(Self::KIND, "last_name", &self.last_name)?;
        require_text(Self::KIND, "department", &self.department)?;
        require_non_negative(Self::KIND, "salary", self.salary)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "first_name" => text(&self.first_name),
            "last_name" => text(&self.last_name),
            "department" => text(&self.department),
            "salary" => Some(FieldValue::Number(self.salary)),
            _ => None,
        }
    }
}
