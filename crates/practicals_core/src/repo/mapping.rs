//! Table mapping for each record type.
//!
//! Column names equal `Record::FIELDS`; every table also carries an
//! `INTEGER PRIMARY KEY AUTOINCREMENT` column named `id`.

use crate::model::book::Book;
use crate::model::employee::Employee;
use crate::model::guestbook::GuestbookEntry;
use crate::model::task::Task;
use crate::model::user::User;
use crate::model::{Record, RecordId};
use rusqlite::types::Value;
use rusqlite::Row;

/// SQL-side description of a record type.
pub trait TableMapping: Record {
    const TABLE: &'static str;

    /// Column values in `Record::FIELDS` order.
    fn bind_values(&self) -> Vec<Value>;

    /// Decodes one row selected as `id, FIELDS...`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn row_id(row: &Row<'_>) -> rusqlite::Result<Option<RecordId>> {
    Ok(Some(row.get::<_, RecordId>("id")?))
}

impl TableMapping for Employee {
    const TABLE: &'static str = "employees";

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.first_name.clone()),
            Value::Text(self.last_name.clone()),
            Value::Text(self.department.clone()),
            Value::Real(self.salary),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row_id(row)?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            department: row.get("department")?,
            salary: row.get("salary")?,
        })
    }
}

impl TableMapping for Task {
    const TABLE: &'static str = "tasks";

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.description.clone()),
            Value::Text(self.assignee_email.clone()),
            Value::Real(self.priority),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row_id(row)?,
            title: row.get("title")?,
            description: row.get("description")?,
            assignee_email: row.get("assignee_email")?,
            priority: row.get("priority")?,
        })
    }
}

impl TableMapping for Book {
    const TABLE: &'static str = "books";

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.author.clone()),
            Value::Text(self.isbn.clone()),
            Value::Real(self.price),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row_id(row)?,
            title: row.get("title")?,
            author: row.get("author")?,
            isbn: row.get("isbn")?,
            price: row.get("price")?,
        })
    }
}

impl TableMapping for GuestbookEntry {
    const TABLE: &'static str = "guestbook_entries";

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.message.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row_id(row)?,
            name: row.get("name")?,
            message: row.get("message")?,
        })
    }
}

impl TableMapping for User {
    const TABLE: &'static str = "users";

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.username.clone()),
            Value::Text(self.email.clone()),
            Value::Text(self.display_name.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row_id(row)?,
            username: row.get("username")?,
            email: row.get("email")?,
            display_name: row.get("display_name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TableMapping;
    use crate::model::book::Book;
    use crate::model::employee::Employee;
    use crate::model::guestbook::GuestbookEntry;
    use crate::model::task::Task;
    use crate::model::user::User;
    use crate::model::Record;

    fn assert_arity<T: TableMapping>(sample: T) {
        assert_eq!(
            sample.bind_values().len(),
            T::FIELDS.len(),
            "{} bind values must follow FIELDS",
            T::KIND
        );
    }

    #[test]
    fn bind_values_match_declared_fields() {
        assert_arity(Employee::new("a", "b", "c", 1.0));
        assert_arity(Task::new("t"));
        assert_arity(Book::new("t", "a", 1.0));
        assert_arity(GuestbookEntry::new("n", "m"));
        assert_arity(User::new("u", "u@example.com"));
    }
}
