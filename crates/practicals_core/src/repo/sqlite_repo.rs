//! SQLite implementation of the generic record repository.
//!
//! # Responsibility
//! - Provide CRUD over one record table per `TableMapping` type.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - Create paths reject records that already carry an id.
//! - Read paths re-validate rows and reject invalid persisted state.
//! - `save_all` runs inside a savepoint, so it is atomic on a bare
//!   connection and composes with an enclosing transaction.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::{Record, RecordId, ValidationError};
use crate::repo::{RepoError, RepoResult, Repository, TableMapping};
use log::{debug, error};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::marker::PhantomData;

const SAVE_ALL_SAVEPOINT: &str = "practicals_save_all";

/// SQLite-backed repository for one record type.
///
/// Works on a plain connection as well as on a `rusqlite::Transaction`
/// (through deref), which is how units of work reuse it.
pub struct SqliteRepository<'conn, T> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> T>,
}

impl<'conn, T: TableMapping> SqliteRepository<'conn, T> {
    /// Creates a repository after checking the connection is migrated and
    /// carries the expected table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready::<T>(conn)?;
        Ok(Self {
            conn,
            _record: PhantomData,
        })
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", T::FIELDS.join(", "), T::TABLE)
    }

    fn insert_row(&self, record: &T) -> RepoResult<T> {
        let placeholders = (1..=T::FIELDS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            T::TABLE,
            T::FIELDS.join(", ")
        );
        self.conn
            .prepare_cached(&sql)?
            .execute(params_from_iter(record.bind_values()))?;

        let id = self.conn.last_insert_rowid();
        debug!(
            "event=record_create module=repo status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(record.with_id(id))
    }

    fn decode_row(row: &rusqlite::Row<'_>) -> RepoResult<T> {
        let record = T::from_row(row)
            .map_err(|err| RepoError::InvalidData(format!("{} row: {err}", T::TABLE)))?;
        record.validate().map_err(|err| {
            RepoError::InvalidData(format!("{} row {:?}: {err}", T::TABLE, record.id()))
        })?;
        Ok(record)
    }
}

impl<T: TableMapping> Repository<T> for SqliteRepository<'_, T> {
    fn create(&self, record: &T) -> RepoResult<T> {
        ensure_unsaved(record)?;
        record.validate()?;
        self.insert_row(record)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<T>> {
        let sql = format!("{} WHERE id = ?1;", Self::select_sql());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Self::decode_row(row)?));
        }

        Ok(None)
    }

    fn update(&self, id: RecordId, record: &T) -> RepoResult<T> {
        record.validate()?;

        let assignments = T::FIELDS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            T::TABLE,
            T::FIELDS.len() + 1
        );

        let mut values = record.bind_values();
        values.push(rusqlite::types::Value::Integer(id));
        let changed = self
            .conn
            .prepare_cached(&sql)?
            .execute(params_from_iter(values))?;

        if changed == 0 {
            return Err(RepoError::NotFound { kind: T::KIND, id });
        }

        debug!(
            "event=record_update module=repo status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(record.with_id(id))
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1;", T::TABLE);
        let changed = self.conn.prepare_cached(&sql)?.execute([id])?;

        if changed == 0 {
            return Err(RepoError::NotFound { kind: T::KIND, id });
        }

        debug!(
            "event=record_delete module=repo status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(())
    }

    fn list(&self) -> RepoResult<Vec<T>> {
        let sql = format!("{} ORDER BY id ASC;", Self::select_sql());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(Self::decode_row(row)?);
        }

        Ok(records)
    }

    fn save_all(&self, records: &[T]) -> RepoResult<Vec<T>> {
        for record in records {
            ensure_unsaved(record)?;
            record.validate()?;
        }

        self.conn
            .execute_batch(&format!("SAVEPOINT {SAVE_ALL_SAVEPOINT};"))?;
        let inserted = records
            .iter()
            .map(|record| self.insert_row(record))
            .collect::<RepoResult<Vec<_>>>();

        match inserted {
            Ok(saved) => {
                self.conn
                    .execute_batch(&format!("RELEASE {SAVE_ALL_SAVEPOINT};"))?;
                Ok(saved)
            }
            Err(err) => {
                // Both statements are required: ROLLBACK TO keeps the
                // savepoint open, RELEASE pops it.
                if let Err(rollback_err) = self.conn.execute_batch(&format!(
                    "ROLLBACK TO {SAVE_ALL_SAVEPOINT}; RELEASE {SAVE_ALL_SAVEPOINT};"
                )) {
                    error!(
                        "event=record_save_all module=repo status=error kind={} rollback_error={} error={}",
                        T::KIND,
                        rollback_err,
                        err
                    );
                }
                Err(err)
            }
        }
    }
}

fn ensure_unsaved<T: Record>(record: &T) -> RepoResult<()> {
    if let Some(id) = record.id() {
        return Err(ValidationError::IdAlreadyAssigned { kind: T::KIND, id }.into());
    }
    Ok(())
}

fn ensure_connection_ready<T: TableMapping>(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, T::TABLE)? {
        return Err(RepoError::MissingRequiredTable(T::TABLE));
    }

    for column in std::iter::once(&"id").chain(T::FIELDS.iter()) {
        if !table_has_column(conn, T::TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: T::TABLE,
                column: *column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
