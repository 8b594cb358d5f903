//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open one connection per store call.
//! - Run schema creation, column steps and seeding exactly once at startup.
//!
//! # Invariants
//! - Returned connections are in autocommit mode; callers own any transaction.
//! - Bootstrap is safe to run against fresh and legacy database files.

use super::migrations::{apply_schema, ensure_employee_columns};
use super::{DbError, DbResult};
use crate::seed::SeedData;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Instant;

/// Opens a SQLite connection to an already bootstrapped database file.
///
/// The file is never created here: a vanished database surfaces as an error
/// instead of an empty schema-less file.
pub fn open_connection(path: impl AsRef<Path>) -> DbResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Creates the schema, applies additive column steps and seeds reference data.
///
/// # Side effects
/// - Creates the database file when absent.
/// - Emits `db_bootstrap` logging events with duration and status.
///
/// # Errors
/// - Table creation and seed inserts propagate their SQLite error.
/// - Column step failures are logged and never returned.
pub fn bootstrap_database(path: impl AsRef<Path>, seed: &SeedData) -> DbResult<()> {
    let started_at = Instant::now();
    let path = path.as_ref();
    info!(
        "event=db_bootstrap module=db status=start path={}",
        path.display()
    );

    let result = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn, seed));
    match &result {
        Ok(()) => info!(
            "event=db_bootstrap module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_bootstrap module=db status=error duration_ms={} error_code=db_bootstrap_failed error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn bootstrap_connection(conn: &mut Connection, seed: &SeedData) -> DbResult<()> {
    let tx = conn.transaction()?;
    apply_schema(&tx)?;
    let report = ensure_employee_columns(&tx);
    if !report.added.is_empty() {
        info!(
            "event=db_migrate module=db status=ok table=employees added={}",
            report.added.join(",")
        );
    }
    seed.apply(&tx)?;
    tx.commit()?;
    Ok(())
}
