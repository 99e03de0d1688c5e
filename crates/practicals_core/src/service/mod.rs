//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, filter and transaction calls into use cases.
//! - Keep transport layers decoupled from storage details.

pub mod book_service;
pub mod employee_service;
pub mod record_service;
pub mod task_service;
