//! Atomic units of work over the record repositories.
//!
//! # Responsibility
//! - Run caller-supplied repository mutations as one commit decision.
//! - Translate failures inside a unit of work into a rolled-back `Err`.
//!
//! # Invariants
//! - Mutations of a failed unit of work are never visible to any reader.
//! - At most one unit of work is active per connection; writers on other
//!   connections are serialized by the SQLite write lock.

mod coordinator;

pub use coordinator::{TransactionCoordinator, UnitOfWork};
