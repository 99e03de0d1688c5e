//! Equality and inclusive-range filters.
//!
//! Inputs are snapshots, typically `Repository::list()`. Numeric equality is
//! exact; text equality is case-sensitive.

use crate::model::{FieldValue, Record, ValidationError};
use crate::repo::RepoResult;

/// Returns every record whose `field` equals `value`.
///
/// # Errors
/// - `ValidationError::UnknownField` when `T` has no such field.
pub fn by_field_equals<T: Record>(
    records: &[T],
    field: &str,
    value: &FieldValue,
) -> RepoResult<Vec<T>> {
    ensure_known_field::<T>(field)?;
    Ok(records
        .iter()
        .filter(|record| record.field(field).as_ref() == Some(value))
        .cloned()
        .collect())
}

/// Returns the first record whose `field` equals `value`.
///
/// Several matches are allowed; callers that expect a unique value get the
/// earliest inserted one.
pub fn first_match<T: Record>(
    records: &[T],
    field: &str,
    value: &FieldValue,
) -> RepoResult<Option<T>> {
    ensure_known_field::<T>(field)?;
    Ok(records
        .iter()
        .find(|record| record.field(field).as_ref() == Some(value))
        .cloned())
}

/// Returns every record with `low <= field <= high`.
///
/// # Errors
/// - `UnknownField` / `NonNumericField` for a missing or text field.
/// - `InvalidRange` when `low > high` or either bound is NaN.
pub fn by_range<T: Record>(records: &[T], field: &str, low: f64, high: f64) -> RepoResult<Vec<T>> {
    ensure_known_field::<T>(field)?;
    if low.is_nan() || high.is_nan() || low > high {
        return Err(ValidationError::InvalidRange { low, high }.into());
    }

    let mut matched = Vec::new();
    for record in records {
        let value = match record.field(field).as_ref().and_then(FieldValue::as_number) {
            Some(value) => value,
            None => {
                return Err(ValidationError::NonNumericField {
                    kind: T::KIND,
                    field: field.to_string(),
                }
                .into())
            }
        };
        if low <= value && value <= high {
            matched.push(record.clone());
        }
    }
    Ok(matched)
}

fn ensure_known_field<T: Record>(field: &str) -> Result<(), ValidationError> {
    if T::FIELDS.iter().any(|known| *known == field) {
        return Ok(());
    }
    Err(ValidationError::UnknownField {
        kind: T::KIND,
        field: field.to_string(),
    })
}
