//! Employee use cases that need transactional guarantees.
//!
//! # Invariants
//! - Multi-employee writes commit together or not at all.
//! - The salary guard is checked after the guarded hire is written, so a
//!   violation rolls back rows that were already inserted.

use crate::model::employee::Employee;
use crate::repo::{RepoResult, Repository, SqliteRepository};
use crate::transaction::TransactionCoordinator;
use log::info;
use rusqlite::Connection;

/// Message raised when the salary guard rejects a hire.
pub const SALARY_GUARD_MESSAGE: &str = "Simulating an error to test rollback!";

/// Employee service bound to one connection.
pub struct EmployeeService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EmployeeService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Read-side repository over committed rows.
    pub fn repository(&self) -> RepoResult<SqliteRepository<'conn, Employee>> {
        SqliteRepository::try_new(self.conn)
    }

    /// Stores `first`, then `guarded`, then checks that `guarded.salary`
    /// does not exceed `salary_cap`.
    ///
    /// # Errors
    /// - `BusinessRule(SALARY_GUARD_MESSAGE)` when the cap is exceeded; neither
    ///   employee is stored.
    /// - Validation/db errors from either insert, also with full rollback.
    pub fn save_with_salary_guard(
        &self,
        first: &Employee,
        guarded: &Employee,
        salary_cap: f64,
    ) -> RepoResult<(Employee, Employee)> {
        let saved = TransactionCoordinator::new(self.conn).run(|unit| {
            let repo = unit.repository::<Employee>()?;
            let first = repo.create(first)?;
            let guarded = repo.create(guarded)?;
            unit.ensure(guarded.salary <= salary_cap, SALARY_GUARD_MESSAGE)?;
            Ok((first, guarded))
        })?;

        info!(
            "event=employee_guarded_save module=service status=ok first_id={:?} guarded_id={:?}",
            saved.0.id, saved.1.id
        );
        Ok(saved)
    }

    /// Stores every employee in one unit of work.
    pub fn hire_all(&self, employees: &[Employee]) -> RepoResult<Vec<Employee>> {
        TransactionCoordinator::new(self.conn)
            .run(|unit| unit.repository::<Employee>()?.save_all(employees))
    }

    /// Moves every employee of `from` into `to` atomically and returns the
    /// number of moved employees.
    pub fn transfer_department(&self, from: &str, to: &str) -> RepoResult<usize> {
        TransactionCoordinator::new(self.conn).run(|unit| {
            let repo = unit.repository::<Employee>()?;
            let mut moved = 0;
            for employee in repo.list()? {
                if employee.department != from {
                    continue;
                }
                let Some(id) = employee.id else {
                    continue;
                };
                let mut replacement = employee.clone();
                replacement.department = to.to_string();
                repo.update(id, &replacement)?;
                moved += 1;
            }
            info!(
                "event=employee_transfer module=service status=ok tx_id={} from={} to={} moved={}",
                unit.tx_id(),
                from,
                to,
                moved
            );
            Ok(moved)
        })
    }
}
