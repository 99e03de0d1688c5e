//! Process-wide application context.
//!
//! # Responsibility
//! - Own the connection and notifier created at startup.
//! - Hand out services bound to them, so handlers receive state
//!   explicitly instead of through globals.

use crate::config::AppConfig;
use crate::db::{open_db_in_memory_with, open_db_with};
use crate::model::book::Book;
use crate::notify::{LogNotifier, Notifier};
use crate::repo::{RepoResult, SqliteRepository, TableMapping};
use crate::service::book_service::BookCatalog;
use crate::service::employee_service::EmployeeService;
use crate::service::record_service::RecordService;
use crate::service::task_service::TaskService;
use crate::transaction::TransactionCoordinator;
use rusqlite::Connection;

/// State constructed once per process and passed to every operation.
pub struct AppContext {
    config: AppConfig,
    conn: Connection,
    notifier: Box<dyn Notifier + Send>,
}

impl AppContext {
    /// Opens the configured database with a [`LogNotifier`].
    pub fn open(config: AppConfig) -> RepoResult<Self> {
        let conn = match config.db_path.as_ref() {
            Some(path) => open_db_with(path, config.open_options())?,
            None => open_db_in_memory_with(config.open_options())?,
        };
        Ok(Self {
            config,
            conn,
            notifier: Box::new(LogNotifier),
        })
    }

    /// Replaces the notification backend.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier + Send>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn coordinator(&self) -> TransactionCoordinator<'_> {
        TransactionCoordinator::new(&self.conn)
    }

    /// Generic CRUD service for any mapped record type.
    pub fn records<T: TableMapping>(&self) -> RepoResult<RecordService<T, SqliteRepository<'_, T>>> {
        Ok(RecordService::new(SqliteRepository::try_new(&self.conn)?))
    }

    pub fn books(&self) -> RepoResult<BookCatalog<SqliteRepository<'_, Book>>> {
        Ok(BookCatalog::new(SqliteRepository::try_new(&self.conn)?))
    }

    pub fn employees(&self) -> EmployeeService<'_> {
        EmployeeService::new(&self.conn)
    }

    pub fn tasks(&self) -> TaskService<'_, dyn Notifier + Send> {
        TaskService::new(&self.conn, self.notifier.as_ref())
    }
}
