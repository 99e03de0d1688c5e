//! Post-commit notification boundary.
//!
//! # Responsibility
//! - Describe reminder messages produced by committed writes.
//! - Hand them to a pluggable delivery backend.
//!
//! # Invariants
//! - Notifications are only sent after the triggering commit succeeded.
//! - Delivery failure never rolls back the committed record and is not
//!   retried here.

use crate::model::RecordId;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One outbound reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Record kind that triggered the reminder.
    pub kind: &'static str,
    /// Identifier of the committed record.
    pub record_id: RecordId,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Delivery failure reported by a notifier backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Backend refused this recipient or message.
    Rejected { recipient: String, reason: String },
    /// Backend could not be reached.
    Unavailable(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { recipient, reason } => {
                write!(f, "notification to `{recipient}` rejected: {reason}")
            }
            Self::Unavailable(message) => write!(f, "notifier unavailable: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Fire-and-forget delivery backend.
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that records reminders in the core log instead of sending them.
///
/// Only metadata is logged; the body is left out.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            "event=notify module=notify status=ok kind={} record_id={} subject_len={}",
            notification.kind,
            notification.record_id,
            notification.subject.chars().count()
        );
        Ok(())
    }
}
