//! Transactional record store behind the practicals tutorials.
//!
//! Records (tasks, employees, books, guestbook entries, users) live in
//! SQLite tables. Multi-record writes go through
//! [`TransactionCoordinator::run`], which commits all of them or none.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod query;
pub mod repo;
pub mod service;
pub mod transaction;

pub use config::AppConfig;
pub use context::AppContext;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::Book;
pub use model::employee::Employee;
pub use model::guestbook::GuestbookEntry;
pub use model::task::Task;
pub use model::user::User;
pub use model::{FieldValue, Record, RecordId, ValidationError};
pub use notify::{LogNotifier, Notification, Notifier, NotifyError};
pub use repo::{RepoError, RepoResult, Repository, SqliteRepository, TableMapping};
pub use service::book_service::BookCatalog;
pub use service::employee_service::{EmployeeService, SALARY_GUARD_MESSAGE};
pub use service::record_service::RecordService;
pub use service::task_service::{ReminderStatus, TaskCreated, TaskService};
pub use transaction::{TransactionCoordinator, UnitOfWork};

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
