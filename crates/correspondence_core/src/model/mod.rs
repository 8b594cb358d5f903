//! Typed domain model for correspondence data.
//!
//! # Responsibility
//! - Define one explicit struct per table row so raw result sets never cross
//!   the store interface.
//! - Hold write-path validation shared by every repository.
//!
//! # Invariants
//! - Rows are identified by SQLite integer ids, unique within their table.
//! - Record ownership of attachments is a [`RecordRef`], never a bare tag.

pub mod attachment;
pub mod employee;
pub mod record;
pub mod reference;
pub mod setting;
pub mod stats;

pub use attachment::{Attachment, NewAttachment, RecordKind, RecordRef};
pub use employee::{Employee, NewEmployee};
pub use record::{IncomingRecord, IncomingRecordInput, OutgoingRecord, OutgoingRecordInput};
pub use reference::{ReferenceEntry, ReferenceKind};
pub use setting::SystemSetting;
pub use stats::{DateRange, EmployeeStats, EMAIL_TYPE_KEYWORDS};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Write-path validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    EmptyField(&'static str),
    /// Employee email is present but not shaped like an address.
    InvalidEmail(String),
    /// Date range start is after its end.
    InvertedRange,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::InvertedRange => write!(f, "date range start must not be after its end"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
