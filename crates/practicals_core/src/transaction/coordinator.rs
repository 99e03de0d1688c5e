use crate::repo::{RepoError, RepoResult, SqliteRepository, TableMapping};
use log::{debug, error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;
use uuid::Uuid;

/// Executes units of work atomically on one connection.
///
/// Reads that do not need atomicity should use a repository on the
/// connection directly; they only ever see committed rows.
pub struct TransactionCoordinator<'conn> {
    conn: &'conn Connection,
}

/// Handle passed to a unit of work while its transaction is open.
pub struct UnitOfWork<'tx> {
    conn: &'tx Connection,
    tx_id: Uuid,
}

impl<'conn> TransactionCoordinator<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Runs `work` inside one `IMMEDIATE` transaction.
    ///
    /// Returns the closure's value after commit, or the closure's error
    /// unchanged after rollback.
    ///
    /// # Errors
    /// - `IllegalState` when a transaction is already open on this connection.
    /// - `Conflict` when another writer keeps the write lock past the busy
    ///   timeout.
    /// - Any error returned by `work`, after all of its mutations are
    ///   discarded.
    pub fn run<R, F>(&self, work: F) -> RepoResult<R>
    where
        F: FnOnce(&UnitOfWork<'_>) -> RepoResult<R>,
    {
        if !self.conn.is_autocommit() {
            warn!("event=tx_begin module=transaction status=error error_code=nested_transaction");
            return Err(RepoError::IllegalState(
                "a unit of work is already active on this connection",
            ));
        }

        let tx_id = Uuid::new_v4();
        let started_at = Instant::now();
        debug!("event=tx_begin module=transaction status=start tx_id={tx_id}");

        let tx = match Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate) {
            Ok(tx) => tx,
            Err(err) => {
                let err = RepoError::from(err);
                warn!(
                    "event=tx_begin module=transaction status=error tx_id={} error_code={} error={}",
                    tx_id,
                    err.code(),
                    err
                );
                return Err(err);
            }
        };

        let outcome = {
            let unit = UnitOfWork { conn: &tx, tx_id };
            work(&unit)
        };

        match outcome {
            Ok(value) => {
                if let Err(err) = tx.commit() {
                    let err = RepoError::from(err);
                    error!(
                        "event=tx_commit module=transaction status=error tx_id={} duration_ms={} error_code={} error={}",
                        tx_id,
                        started_at.elapsed().as_millis(),
                        err.code(),
                        err
                    );
                    return Err(err);
                }
                info!(
                    "event=tx_commit module=transaction status=ok tx_id={} duration_ms={}",
                    tx_id,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=tx_rollback module=transaction status=error tx_id={} error={}",
                        tx_id, rollback_err
                    );
                }
                info!(
                    "event=tx_rollback module=transaction status=ok tx_id={} duration_ms={} error_code={} error={}",
                    tx_id,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl<'tx> UnitOfWork<'tx> {
    /// Correlation id of the enclosing transaction, used in logs.
    pub fn tx_id(&self) -> Uuid {
        self.tx_id
    }

    /// Returns a repository whose writes belong to this unit of work.
    pub fn repository<T: TableMapping>(&self) -> RepoResult<SqliteRepository<'tx, T>> {
        SqliteRepository::try_new(self.conn)
    }

    /// Fails the unit of work with a `BusinessRule` error unless `condition`
    /// holds.
    pub fn ensure(&self, condition: bool, message: impl Into<String>) -> RepoResult<()> {
        if condition {
            return Ok(());
        }
        Err(RepoError::business_rule(message))
    }
}
