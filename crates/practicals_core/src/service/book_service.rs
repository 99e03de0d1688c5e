//! Book catalog lookups.

use crate::model::book::Book;
use crate::model::FieldValue;
use crate::repo::{RepoResult, Repository};
use crate::service::record_service::RecordService;

/// Catalog facade with the book-specific query methods.
pub struct BookCatalog<R: Repository<Book>> {
    records: RecordService<Book, R>,
}

impl<R: Repository<Book>> BookCatalog<R> {
    pub fn new(repo: R) -> Self {
        Self {
            records: RecordService::new(repo),
        }
    }

    /// Underlying CRUD entry points.
    pub fn records(&self) -> &RecordService<Book, R> {
        &self.records
    }

    pub fn find_by_author(&self, author: &str) -> RepoResult<Vec<Book>> {
        self.records.find_all("author", &FieldValue::from(author))
    }

    /// Titles are not unique; the earliest stored match wins.
    pub fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        self.records.find_first("title", &FieldValue::from(title))
    }

    pub fn find_by_price_range(&self, low: f64, high: f64) -> RepoResult<Vec<Book>> {
        self.records.find_in_range("price", low, high)
    }
}
