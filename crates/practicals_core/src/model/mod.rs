//! Flat record types persisted by the record store.
//!
//! # Responsibility
//! - Define canonical record shapes for the tutorial domains.
//! - Expose field-level access used by the query filter.
//!
//! # Invariants
//! - `id` is `None` until the record is first stored, then immutable.
//! - Records never reference each other.
//! - Validation is pure and storage-agnostic.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod book;
pub mod employee;
pub mod guestbook;
pub mod task;
pub mod user;
pub mod validation;

pub use validation::ValidationError;

/// Store-assigned identifier, unique within one record type.
pub type RecordId = i64;

/// Scalar value of one named record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Returns the numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Capability set shared by every persisted record type.
pub trait Record: Clone {
    /// Stable lowercase kind name used in errors and logs.
    const KIND: &'static str;
    /// Named scalar fields, excluding `id`.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Option<RecordId>;

    /// Returns a copy carrying the given identifier.
    fn with_id(&self, id: RecordId) -> Self;

    /// Checks required fields and value constraints.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Reads one field by name. `None` for unknown names.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

pub(crate) fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(value.to_string()))
}
