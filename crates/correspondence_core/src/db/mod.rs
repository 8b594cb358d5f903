//! SQLite storage bootstrap and schema evolution entry points.
//!
//! # Responsibility
//! - Open and configure short-lived SQLite connections for the store.
//! - Create the schema and apply additive column steps.
//!
//! # Invariants
//! - Schema creation is idempotent (`CREATE TABLE IF NOT EXISTS`).
//! - Column steps never drop or rewrite existing data.
//! - No `PRAGMA user_version` bookkeeping: evolution is introspection-driven.

use crate::seed::SeedError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{bootstrap_database, open_connection};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io {
        path: String,
        source: std::io::Error,
    },
    Seed(SeedError),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "io error at `{path}`: {source}"),
            Self::Seed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Seed(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<SeedError> for DbError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}
