//! Validation errors shared by record types and the query filter.

use std::error::Error;
use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Malformed or missing input detected before persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is blank after trim.
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    /// Numeric field is NaN, infinite, or below its lower bound.
    InvalidNumber {
        kind: &'static str,
        field: &'static str,
        value: f64,
    },
    /// Text field does not look like an email address.
    InvalidEmail {
        kind: &'static str,
        field: &'static str,
        value: String,
    },
    /// A create request already carried an identifier.
    IdAlreadyAssigned { kind: &'static str, id: i64 },
    /// Filter referenced a field the record type does not have.
    UnknownField { kind: &'static str, field: String },
    /// Range filter referenced a text field.
    NonNumericField { kind: &'static str, field: String },
    /// Range bounds are reversed or not comparable.
    InvalidRange { low: f64, high: f64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { kind, field } => {
                write!(f, "{kind}.{field} is required")
            }
            Self::InvalidNumber { kind, field, value } => {
                write!(f, "{kind}.{field} has invalid value {value}")
            }
            Self::InvalidEmail { kind, field, value } => {
                write!(f, "{kind}.{field} is not a valid email: `{value}`")
            }
            Self::IdAlreadyAssigned { kind, id } => {
                write!(f, "{kind} already has id {id}; create expects no id")
            }
            Self::UnknownField { kind, field } => write!(f, "{kind} has no field `{field}`"),
            Self::NonNumericField { kind, field } => {
                write!(f, "{kind}.{field} is not numeric")
            }
            Self::InvalidRange { low, high } => {
                write!(f, "invalid range: low {low} must not exceed high {high}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { kind, field });
    }
    Ok(())
}

pub(crate) fn require_finite(
    kind: &'static str,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber { kind, field, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    kind: &'static str,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    require_finite(kind, field, value)?;
    if value < 0.0 {
        return Err(ValidationError::InvalidNumber { kind, field, value });
    }
    Ok(())
}

pub(crate) fn require_email(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidEmail {
            kind,
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
