//! Generic record use-case service.
//!
//! # Responsibility
//! - Provide the list/get/save/delete entry points every tutorial exposes.
//! - Route lookups through the query filter over a committed snapshot.
//!
//! # Invariants
//! - `save` creates when the record has no id and fully replaces otherwise.
//! - Service APIs never bypass repository validation.

use crate::model::{FieldValue, Record, RecordId};
use crate::query::filter;
use crate::repo::{RepoResult, Repository};
use std::marker::PhantomData;

/// Use-case wrapper around one record repository.
pub struct RecordService<T, R> {
    repo: R,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record, R: Repository<T>> RecordService<T, R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    pub fn get_all(&self) -> RepoResult<Vec<T>> {
        self.repo.list()
    }

    pub fn get_by_id(&self, id: RecordId) -> RepoResult<Option<T>> {
        self.repo.get(id)
    }

    /// Creates or replaces a record depending on whether it carries an id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn save(&self, record: &T) -> RepoResult<T> {
        match record.id() {
            Some(id) => self.replace(id, record),
            None => self.repo.create(record),
        }
    }

    /// Replaces the record stored under `id`; an id carried by `record` is
    /// ignored.
    pub fn replace(&self, id: RecordId, record: &T) -> RepoResult<T> {
        self.repo.update(id, record)
    }

    pub fn save_all(&self, records: &[T]) -> RepoResult<Vec<T>> {
        self.repo.save_all(records)
    }

    pub fn delete(&self, id: RecordId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    /// Lists records whose `field` equals `value`, in insertion order.
    pub fn find_all(&self, field: &str, value: &FieldValue) -> RepoResult<Vec<T>> {
        filter::by_field_equals(&self.repo.list()?, field, value)
    }

    /// Returns the earliest record whose `field` equals `value`.
    pub fn find_first(&self, field: &str, value: &FieldValue) -> RepoResult<Option<T>> {
        filter::first_match(&self.repo.list()?, field, value)
    }

    /// Lists records whose numeric `field` lies in `[low, high]`.
    pub fn find_in_range(&self, field: &str, low: f64, high: f64) -> RepoResult<Vec<T>> {
        filter::by_range(&self.repo.list()?, field, low, high)
    }
}
