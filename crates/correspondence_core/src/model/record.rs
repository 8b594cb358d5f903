//! Incoming and outgoing correspondence records.
//!
//! # Invariants
//! - `record_number` is unique per table and never reused.
//! - Reference ids are nullable and may dangle; nothing here resolves them.

use super::{require_text, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Persisted incoming record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomingRecord {
    pub id: i64,
    pub record_number: String,
    pub incoming_number: String,
    pub serial_number: String,
    pub title: String,
    pub source_id: Option<i64>,
    pub type_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub specialization_id: Option<i64>,
    pub registration_date: Option<NaiveDate>,
    pub details: Option<String>,
    pub created_date: Option<NaiveDateTime>,
}

/// Persisted outgoing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingRecord {
    pub id: i64,
    pub record_number: String,
    pub outgoing_number: String,
    pub serial_number: String,
    pub title: String,
    pub destination_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub specialization_id: Option<i64>,
    pub registration_date: Option<NaiveDate>,
    pub details: Option<String>,
    pub created_date: Option<NaiveDateTime>,
}

/// Write model for incoming records.
///
/// `registration_date = None` means "today" on insert and "unchanged" on
/// update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRecordInput {
    pub record_number: String,
    pub incoming_number: String,
    pub serial_number: String,
    pub title: String,
    pub source_id: Option<i64>,
    pub type_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub specialization_id: Option<i64>,
    pub registration_date: Option<NaiveDate>,
    pub details: Option<String>,
}

/// Write model for outgoing records. Same date semantics as
/// [`IncomingRecordInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingRecordInput {
    pub record_number: String,
    pub outgoing_number: String,
    pub serial_number: String,
    pub title: String,
    pub destination_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub specialization_id: Option<i64>,
    pub registration_date: Option<NaiveDate>,
    pub details: Option<String>,
}

impl IncomingRecordInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.record_number, "record_number")?;
        require_text(&self.title, "title")
    }
}

impl OutgoingRecordInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.record_number, "record_number")?;
        require_text(&self.title, "title")
    }
}
