//! Schema creation and additive column steps.
//!
//! # Responsibility
//! - Create every table when absent.
//! - Bring `employees` up to the current column set without touching data.
//!
//! # Invariants
//! - Each column step is independently idempotent.
//! - A step is skipped when `PRAGMA table_info` already lists the column.
//! - A "duplicate column name" failure is treated as already applied.
//! - Any other step failure is logged and startup continues.

use crate::db::DbResult;
use log::{debug, warn};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("0001_schema.sql");

const DUPLICATE_COLUMN_MARKER: &str = "duplicate column name";

/// One additive `ALTER TABLE ... ADD COLUMN` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnStep {
    pub table: &'static str,
    pub column: &'static str,
    pub definition: &'static str,
}

/// Optional `employees` columns added after the first schema release.
pub const EMPLOYEE_COLUMN_STEPS: &[ColumnStep] = &[
    ColumnStep {
        table: "employees",
        column: "email",
        definition: "TEXT",
    },
    ColumnStep {
        table: "employees",
        column: "phone",
        definition: "TEXT",
    },
    ColumnStep {
        table: "employees",
        column: "fax_count",
        definition: "INTEGER DEFAULT 0",
    },
    ColumnStep {
        table: "employees",
        column: "email_count",
        definition: "INTEGER DEFAULT 0",
    },
];

/// Tables created by [`apply_schema`].
pub const TABLES: &[&str] = &[
    "incoming_sources",
    "outgoing_destinations",
    "incoming_types",
    "employees",
    "specializations",
    "incoming_records",
    "outgoing_records",
    "attachments",
    "system_settings",
];

/// Outcome of one column step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Added,
    AlreadyPresent,
    Failed(String),
}

/// Per-run summary of the column steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub added: Vec<&'static str>,
    pub already_present: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

/// Creates all tables and indexes that do not exist yet.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Applies [`EMPLOYEE_COLUMN_STEPS`] and reports what happened.
///
/// Never fails: a broken step leaves the store in a degraded but usable state.
pub fn ensure_employee_columns(conn: &Connection) -> MigrationReport {
    let mut report = MigrationReport::default();
    for step in EMPLOYEE_COLUMN_STEPS {
        match apply_column_step(conn, step) {
            StepOutcome::Added => report.added.push(step.column),
            StepOutcome::AlreadyPresent => report.already_present.push(step.column),
            StepOutcome::Failed(message) => {
                warn!(
                    "event=db_migrate module=db status=error table={} column={} error={}",
                    step.table, step.column, message
                );
                report.failed.push((step.column, message));
            }
        }
    }
    report
}

/// Applies one column step.
pub fn apply_column_step(conn: &Connection, step: &ColumnStep) -> StepOutcome {
    match table_has_column(conn, step.table, step.column) {
        Ok(true) => return StepOutcome::AlreadyPresent,
        Ok(false) => {}
        // Introspection failure falls through to the ALTER attempt.
        Err(err) => debug!(
            "event=db_migrate module=db status=skip_introspection table={} error={}",
            step.table, err
        ),
    }

    let sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {};",
        step.table, step.column, step.definition
    );
    match conn.execute_batch(&sql) {
        Ok(()) => StepOutcome::Added,
        Err(err) if is_duplicate_column_error(&err) => StepOutcome::AlreadyPresent,
        Err(err) => StepOutcome::Failed(err.to_string()),
    }
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whether `table` currently has `column`, read from live metadata.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
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

fn is_duplicate_column_error(err: &rusqlite::Error) -> bool {
    err.to_string().contains(DUPLICATE_COLUMN_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_employees(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                department TEXT,
                position TEXT,
                is_active BOOLEAN DEFAULT 1
            );",
        )
        .unwrap();
    }

    #[test]
    fn column_step_adds_then_reports_present() {
        let conn = Connection::open_in_memory().unwrap();
        legacy_employees(&conn);

        let step = EMPLOYEE_COLUMN_STEPS[0];
        assert_eq!(apply_column_step(&conn, &step), StepOutcome::Added);
        assert_eq!(apply_column_step(&conn, &step), StepOutcome::AlreadyPresent);
        assert!(table_has_column(&conn, "employees", "email").unwrap());
    }

    #[test]
    fn column_step_on_missing_table_fails_without_panicking() {
        let conn = Connection::open_in_memory().unwrap();

        let report = ensure_employee_columns(&conn);
        assert!(report.added.is_empty());
        assert_eq!(report.failed.len(), EMPLOYEE_COLUMN_STEPS.len());
    }

    #[test]
    fn duplicate_column_error_text_is_recognized() {
        let conn = Connection::open_in_memory().unwrap();
        legacy_employees(&conn);
        conn.execute_batch("ALTER TABLE employees ADD COLUMN phone TEXT;")
            .unwrap();

        let err = conn
            .execute_batch("ALTER TABLE employees ADD COLUMN phone TEXT;")
            .unwrap_err();
        assert!(is_duplicate_column_error(&err));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();

        for table in TABLES {
            assert!(table_exists(&conn, table).unwrap(), "missing {table}");
        }
    }
}
