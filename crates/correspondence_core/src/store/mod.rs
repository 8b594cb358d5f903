//! Correspondence data store facade.
//!
//! # Responsibility
//! - Own the database path and on-disk layout.
//! - Guarantee schema, column steps and seed data exist after construction.
//! - Run every operation on its own short-lived connection.
//! - Convert every storage error into a sentinel at this boundary.
//!
//! # Invariants
//! - No method except [`CorrespondenceStore::open`] returns a storage error.
//!   Failures are logged and surface as `None`, `false` or zero stats, which
//!   callers must read as "nothing happened".
//! - Connections are never cached or shared between calls.
//! - No lock is held across calls; parallel callers are unsupported.

mod backup;
mod catalog;
mod employees;
pub mod query;
mod records;

pub use employees::EmployeeActivity;
pub use query::{is_read_query, ExecOutcome, QueryRow};

use crate::config::{StoreConfig, StoreLayout};
use crate::db::{bootstrap_database, open_connection, DbResult};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Instant;

/// Handle to one correspondence database and its directory layout.
#[derive(Debug, Clone)]
pub struct CorrespondenceStore {
    layout: StoreLayout,
}

impl CorrespondenceStore {
    /// Creates the layout, ensures the schema and seeds default data.
    ///
    /// # Errors
    /// - Returns an error when a layout directory cannot be created.
    /// - Returns an error when table creation or seeding fails.
    ///
    /// Column step failures do not fail construction; the store then runs
    /// with a degraded `employees` table.
    pub fn open(config: StoreConfig) -> DbResult<Self> {
        let StoreConfig { layout, seed } = config;
        layout.ensure_dirs()?;
        bootstrap_database(layout.database_path(), &seed)?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn database_path(&self) -> PathBuf {
        self.layout.database_path()
    }

    /// Runs one statement.
    ///
    /// Returns all rows for `SELECT` statements and the last inserted row id
    /// for anything else. Returns `None` on any failure.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Option<ExecOutcome> {
        self.run("execute", |conn| Ok(query::run_statement(conn, sql, params)?))
    }

    /// Runs one statement once per parameter set inside a single transaction.
    pub fn execute_many(&self, sql: &str, params_list: &[Vec<Value>]) -> bool {
        self.run_mut("execute_many", |conn| {
            Ok(query::run_batch(conn, sql, params_list)?)
        })
        .is_some()
    }

    fn connect(&self) -> DbResult<Connection> {
        open_connection(self.layout.database_path())
    }

    /// Opens a connection, runs `op` and closes the connection again.
    fn run<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> Option<T> {
        let started_at = Instant::now();
        let result = self
            .connect()
            .map_err(RepoError::from)
            .and_then(|conn| op(&conn));
        finish(event, started_at, result)
    }

    fn run_mut<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&mut Connection) -> RepoResult<T>,
    ) -> Option<T> {
        let started_at = Instant::now();
        let result = self
            .connect()
            .map_err(RepoError::from)
            .and_then(|mut conn| op(&mut conn));
        finish(event, started_at, result)
    }
}

fn finish<T>(event: &'static str, started_at: Instant, result: RepoResult<T>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!(
                "event={} module=store status=ok duration_ms={}",
                event,
                started_at.elapsed().as_millis()
            );
            Some(value)
        }
        Err(err) => {
            error!(
                "event={} module=store status=error duration_ms={} error={}",
                event,
                started_at.elapsed().as_millis(),
                err
            );
            None
        }
    }
}
