//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per table family.
//! - Convert raw rows into typed models at the persistence boundary.
//!
//! # Invariants
//! - Write paths validate their input before any SQL mutation.
//! - Unreadable stored dates decode to `None` with a warning; other malformed
//!   values fail the read.
//! - Repositories return `Result`; sentinel conversion happens in the store.

use crate::db::DbError;
use crate::model::{RecordRef, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attachment_repo;
pub mod employee_repo;
pub mod record_repo;
pub mod reference_repo;
pub mod settings_repo;

pub type RepoResult<T> = Result<T, RepoError>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_PREFIX_LEN: usize = 10;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FRACTION_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    DuplicateRecordNumber(String),
    /// Attachment owner does not resolve to an existing record.
    MissingRecord(RecordRef),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateRecordNumber(number) => {
                write!(f, "record number already in use: {number}")
            }
            Self::MissingRecord(owner) => write!(
                f,
                "{} record not found: {}",
                owner.kind().as_tag(),
                owner.id()
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::DuplicateRecordNumber(_) => None,
            Self::MissingRecord(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Reads a stored date.
///
/// Accepts a bare date or any datetime text starting with one. Unreadable
/// text is logged and read as `None` so one legacy row cannot fail a list.
pub(crate) fn parse_date(value: Option<String>, column: &str) -> Option<NaiveDate> {
    let text = value?;
    let trimmed = text.trim();
    let parsed = trimmed
        .get(..DATE_PREFIX_LEN)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
        .or_else(|| parse_datetime(trimmed).map(|datetime| datetime.date()));
    if parsed.is_none() {
        warn!(
            "event=row_decode module=repo status=degraded column={} reason=unreadable_date value={}",
            column, text
        );
    }
    parsed
}

/// Reads SQLite `CURRENT_TIMESTAMP` text; a `T` separator, fractional
/// seconds and a bare date are accepted too. Unreadable text reads as `None`.
pub(crate) fn parse_timestamp(value: Option<String>, column: &str) -> Option<NaiveDateTime> {
    let text = value?;
    let trimmed = text.trim();
    let parsed = parse_datetime(trimmed).or_else(|| {
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    });
    if parsed.is_none() {
        warn!(
            "event=row_decode module=repo status=degraded column={} reason=unreadable_timestamp value={}",
            column, text
        );
    }
    parsed
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let normalized = text.replacen('T', " ", 1);
    NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FRACTION_FORMAT))
        .ok()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{date_to_db, parse_date, parse_timestamp};
    use chrono::NaiveDate;

    #[test]
    fn date_text_roundtrips() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_to_db(date), "2024-03-09");
        assert_eq!(parse_date(Some("2024-03-09".to_string()), "t.c"), Some(date));
    }

    #[test]
    fn date_accepts_datetime_text() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(
            parse_date(Some("2024-01-06 09:30:00".to_string()), "t.c"),
            Some(date)
        );
        assert_eq!(
            parse_date(Some(" 2024-01-06T09:30:00.250 ".to_string()), "t.c"),
            Some(date)
        );
    }

    #[test]
    fn unreadable_date_reads_as_none() {
        assert_eq!(parse_date(Some("09/03/2024".to_string()), "t.c"), None);
        assert_eq!(parse_date(Some("soon".to_string()), "t.c"), None);
        assert_eq!(parse_date(None, "t.c"), None);
    }

    #[test]
    fn timestamp_accepts_common_shapes() {
        for text in [
            "2024-03-09 10:11:12",
            "2024-03-09T10:11:12",
            "2024-03-09 10:11:12.345",
            "2024-03-09",
        ] {
            assert!(parse_timestamp(Some(text.to_string()), "t.c").is_some(), "{text}");
        }
        assert!(parse_timestamp(Some("yesterday".to_string()), "t.c").is_none());
        assert!(parse_timestamp(None, "t.c").is_none());
    }
}
