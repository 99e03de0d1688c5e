//! Read-only predicate evaluation over committed record snapshots.
//!
//! # Invariants
//! - Filters never mutate state and preserve input order.
//! - Empty results are not errors.

pub mod filter;

pub use filter::{by_field_equals, by_range, first_match};
