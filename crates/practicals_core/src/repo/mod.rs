//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the generic record CRUD contract.
//! - Isolate SQLite query details from services and the transaction layer.
//!
//! # Invariants
//! - Write paths call `Record::validate()` before any SQL mutation.
//! - Absent identifiers surface as `None` on reads and `NotFound` on writes,
//!   never as transport errors.

pub mod error;
pub mod mapping;
pub mod sqlite_repo;

pub use error::{RepoError, RepoResult};
pub use mapping::TableMapping;
pub use sqlite_repo::SqliteRepository;

use crate::model::{Record, RecordId};

/// Generic CRUD contract implemented once per storage backend.
pub trait Repository<T: Record> {
    /// Stores a record without identifier and returns it with the assigned id.
    fn create(&self, record: &T) -> RepoResult<T>;
    /// Returns the committed record, or `None` when the id is absent.
    fn get(&self, id: RecordId) -> RepoResult<Option<T>>;
    /// Replaces every field of an existing record. Any id carried by
    /// `record` is ignored; the stored record keeps `id`.
    fn update(&self, id: RecordId, record: &T) -> RepoResult<T>;
    fn delete(&self, id: RecordId) -> RepoResult<()>;
    /// Returns all records in insertion order.
    fn list(&self) -> RepoResult<Vec<T>>;
    /// Creates every record or none of them.
    fn save_all(&self, records: &[T]) -> RepoResult<Vec<T>>;
}
