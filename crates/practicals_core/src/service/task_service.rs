//! Task creation with post-commit reminders.
//!
//! # Invariants
//! - The reminder is attempted only after the task row is committed.
//! - A failed reminder is reported in the result and logged, never rolled
//!   back into the task write.

use crate::model::task::Task;
use crate::model::Record;
use crate::notify::{Notification, Notifier, NotifyError};
use crate::repo::{RepoResult, Repository};
use crate::transaction::TransactionCoordinator;
use log::warn;
use rusqlite::Connection;

/// Outcome of the reminder attached to a task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderStatus {
    Sent,
    /// The task has no assignee.
    Skipped,
    Failed(NotifyError),
}

/// Result of [`TaskService::create_task`].
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCreated {
    pub task: Task,
    pub reminder: ReminderStatus,
}

/// Task service bound to one connection and one notifier.
pub struct TaskService<'a, N: Notifier + ?Sized> {
    conn: &'a Connection,
    notifier: &'a N,
}

impl<'a, N: Notifier + ?Sized> TaskService<'a, N> {
    pub fn new(conn: &'a Connection, notifier: &'a N) -> Self {
        Self { conn, notifier }
    }

    /// Commits a new task, then sends a reminder to its assignee.
    pub fn create_task(&self, task: &Task) -> RepoResult<TaskCreated> {
        let task = TransactionCoordinator::new(self.conn)
            .run(|unit| unit.repository::<Task>()?.create(task))?;

        let reminder = match reminder_for(&task) {
            None => ReminderStatus::Skipped,
            Some(notification) => match self.notifier.notify(&notification) {
                Ok(()) => ReminderStatus::Sent,
                Err(err) => {
                    warn!(
                        "event=task_reminder module=service status=error task_id={} error={}",
                        notification.record_id, err
                    );
                    ReminderStatus::Failed(err)
                }
            },
        };

        Ok(TaskCreated { task, reminder })
    }
}

fn reminder_for(task: &Task) -> Option<Notification> {
    let recipient = task.assignee()?;
    let record_id = task.id()?;
    Some(Notification {
        kind: Task::KIND,
        record_id,
        recipient: recipient.to_string(),
        subject: format!("New task: {}", task.title),
        body: if task.description.trim().is_empty() {
            task.title.clone()
        } else {
            task.description.clone()
        },
    })
}
