//! Generic statement execution for callers that bring their own SQL.
//!
//! # Invariants
//! - A statement is a read when its trimmed text starts with `SELECT`
//!   (ASCII case-insensitive); everything else is a write.
//! - Writes run in autocommit mode, so returning means committed.
//! - Batches run inside one transaction and commit all-or-nothing.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::Arc;

const READ_KEYWORD: &str = "SELECT";

/// One result row with named column access.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl QueryRow {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.values.get(index)
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Real(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn get_text(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Successful result of [`crate::CorrespondenceStore::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// Full result set of a read statement.
    Rows(Vec<QueryRow>),
    /// `last_insert_rowid()` after a write; `0` when the connection never
    /// inserted.
    LastInsertId(i64),
}

impl ExecOutcome {
    pub fn rows(self) -> Option<Vec<QueryRow>> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::LastInsertId(_) => None,
        }
    }

    pub fn last_insert_id(&self) -> Option<i64> {
        match self {
            Self::Rows(_) => None,
            Self::LastInsertId(id) => Some(*id),
        }
    }
}

/// Returns whether `sql` is treated as a read statement.
pub fn is_read_query(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    trimmed
        .get(..READ_KEYWORD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(READ_KEYWORD))
}

pub(crate) fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> rusqlite::Result<ExecOutcome> {
    let mut stmt = conn.prepare(sql)?;

    if is_read_query(sql) {
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(row.get::<_, Value>(index)?);
            }
            collected.push(QueryRow {
                columns: Arc::clone(&columns),
                values,
            });
        }
        return Ok(ExecOutcome::Rows(collected));
    }

    // Stepped through `query` so row-returning writes (PRAGMA, RETURNING)
    // are drained instead of rejected.
    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    while rows.next()?.is_some() {}
    Ok(ExecOutcome::LastInsertId(conn.last_insert_rowid()))
}

pub(crate) fn run_batch(
    conn: &mut Connection,
    sql: &str,
    params_list: &[Vec<Value>],
) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let mut changed = 0;
    {
        let mut stmt = tx.prepare(sql)?;
        for params in params_list {
            changed += stmt.execute(params_from_iter(params.iter()))?;
        }
    }
    tx.commit()?;
    Ok(changed)
}
