//! Incoming/outgoing record repository.
//!
//! # Responsibility
//! - CRUD over `incoming_records` and `outgoing_records`.
//! - Filtered listing for UI tables and export collaborators.
//!
//! # Invariants
//! - `record_number` uniqueness is checked before writes and backed by the
//!   table's UNIQUE constraint.
//! - Listing is deterministic: `registration_date DESC, id DESC`.

use super::{date_to_db, parse_date, parse_timestamp, RepoError, RepoResult};
use crate::model::{
    DateRange, IncomingRecord, IncomingRecordInput, OutgoingRecord, OutgoingRecordInput,
    RecordKind, RecordRef,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const INCOMING_SELECT_SQL: &str = "SELECT
    id,
    record_number,
    incoming_number,
    serial_number,
    title,
    incoming_source_id,
    incoming_type_id,
    employee_id,
    specialization_id,
    registration_date,
    details,
    created_date
FROM incoming_records";

const OUTGOING_SELECT_SQL: &str = "SELECT
    id,
    record_number,
    outgoing_number,
    serial_number,
    title,
    outgoing_destination_id,
    NULL AS incoming_type_id,
    employee_id,
    specialization_id,
    registration_date,
    details,
    created_date
FROM outgoing_records";

/// Filter and pagination options shared by both record tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordListQuery {
    pub employee_id: Option<i64>,
    pub range: Option<DateRange>,
    /// Substring matched against title, record number and details.
    pub text: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait RecordRepository {
    fn create_incoming(&self, input: &IncomingRecordInput) -> RepoResult<i64>;
    fn update_incoming(&self, id: i64, input: &IncomingRecordInput) -> RepoResult<()>;
    fn get_incoming(&self, id: i64) -> RepoResult<Option<IncomingRecord>>;
    fn list_incoming(&self, query: &RecordListQuery) -> RepoResult<Vec<IncomingRecord>>;

    fn create_outgoing(&self, input: &OutgoingRecordInput) -> RepoResult<i64>;
    fn update_outgoing(&self, id: i64, input: &OutgoingRecordInput) -> RepoResult<()>;
    fn get_outgoing(&self, id: i64) -> RepoResult<Option<OutgoingRecord>>;
    fn list_outgoing(&self, query: &RecordListQuery) -> RepoResult<Vec<OutgoingRecord>>;

    /// Returns whether `record_number` is used by any row other than
    /// `exclude_id`.
    fn record_number_taken(
        &self,
        kind: RecordKind,
        record_number: &str,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool>;
    fn record_exists(&self, record: RecordRef) -> RepoResult<bool>;
}

pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_number_free(
        &self,
        kind: RecordKind,
        record_number: &str,
        exclude_id: Option<i64>,
    ) -> RepoResult<()> {
        if self.record_number_taken(kind, record_number, exclude_id)? {
            return Err(RepoError::DuplicateRecordNumber(record_number.to_string()));
        }
        Ok(())
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_incoming(&self, input: &IncomingRecordInput) -> RepoResult<i64> {
        input.validate()?;
        let record_number = input.record_number.trim();
        self.ensure_number_free(RecordKind::Incoming, record_number, None)?;

        self.conn.execute(
            "INSERT INTO incoming_records (
                record_number,
                incoming_number,
                serial_number,
                title,
                incoming_source_id,
                incoming_type_id,
                employee_id,
                specialization_id,
                registration_date,
                details
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, COALESCE(?9, CURRENT_DATE), ?10);",
            params![
                record_number,
                input.incoming_number.as_str(),
                input.serial_number.as_str(),
                input.title.trim(),
                input.source_id,
                input.type_id,
                input.employee_id,
                input.specialization_id,
                input.registration_date.map(date_to_db),
                input.details.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_incoming(&self, id: i64, input: &IncomingRecordInput) -> RepoResult<()> {
        input.validate()?;
        let record_number = input.record_number.trim();
        self.ensure_number_free(RecordKind::Incoming, record_number, Some(id))?;

        let changed = self.conn.execute(
            "UPDATE incoming_records
             SET
                record_number = ?1,
                incoming_number = ?2,
                serial_number = ?3,
                title = ?4,
                incoming_source_id = ?5,
                incoming_type_id = ?6,
                employee_id = ?7,
                specialization_id = ?8,
                registration_date = COALESCE(?9, registration_date),
                details = ?10
             WHERE id = ?11;",
            params![
                record_number,
                input.incoming_number.as_str(),
                input.serial_number.as_str(),
                input.title.trim(),
                input.source_id,
                input.type_id,
                input.employee_id,
                input.specialization_id,
                input.registration_date.map(date_to_db),
                input.details.as_deref(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "incoming record",
                id,
            });
        }
        Ok(())
    }

    fn get_incoming(&self, id: i64) -> RepoResult<Option<IncomingRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{INCOMING_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_raw,
            )
            .optional()?;
        raw.map(into_incoming).transpose()
    }

    fn list_incoming(&self, query: &RecordListQuery) -> RepoResult<Vec<IncomingRecord>> {
        let (sql, bind_values) = build_list_sql(INCOMING_SELECT_SQL, query);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), read_raw)?;
        let mut records = Vec::new();
        for raw in rows {
            records.push(into_incoming(raw?)?);
        }
        Ok(records)
    }

    fn create_outgoing(&self, input: &OutgoingRecordInput) -> RepoResult<i64> {
        input.validate()?;
        let record_number = input.record_number.trim();
        self.ensure_number_free(RecordKind::Outgoing, record_number, None)?;

        self.conn.execute(
            "INSERT INTO outgoing_records (
                record_number,
                outgoing_number,
                serial_number,
                title,
                outgoing_destination_id,
                employee_id,
                specialization_id,
                registration_date,
                details
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, CURRENT_DATE), ?9);",
            params![
                record_number,
                input.outgoing_number.as_str(),
                input.serial_number.as_str(),
                input.title.trim(),
                input.destination_id,
                input.employee_id,
                input.specialization_id,
                input.registration_date.map(date_to_db),
                input.details.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_outgoing(&self, id: i64, input: &OutgoingRecordInput) -> RepoResult<()> {
        input.validate()?;
        let record_number = input.record_number.trim();
        self.ensure_number_free(RecordKind::Outgoing, record_number, Some(id))?;

        let changed = self.conn.execute(
            "UPDATE outgoing_records
             SET
                record_number = ?1,
                outgoing_number = ?2,
                serial_number = ?3,
                title = ?4,
                outgoing_destination_id = ?5,
                employee_id = ?6,
                specialization_id = ?7,
                registration_date = COALESCE(?8, registration_date),
                details = ?9
             WHERE id = ?10;",
            params![
                record_number,
                input.outgoing_number.as_str(),
                input.serial_number.as_str(),
                input.title.trim(),
                input.destination_id,
                input.employee_id,
                input.specialization_id,
                input.registration_date.map(date_to_db),
                input.details.as_deref(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "outgoing record",
                id,
            });
        }
        Ok(())
    }

    fn get_outgoing(&self, id: i64) -> RepoResult<Option<OutgoingRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{OUTGOING_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_raw,
            )
            .optional()?;
        raw.map(into_outgoing).transpose()
    }

    fn list_outgoing(&self, query: &RecordListQuery) -> RepoResult<Vec<OutgoingRecord>> {
        let (sql, bind_values) = build_list_sql(OUTGOING_SELECT_SQL, query);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), read_raw)?;
        let mut records = Vec::new();
        for raw in rows {
            records.push(into_outgoing(raw?)?);
        }
        Ok(records)
    }

    fn record_number_taken(
        &self,
        kind: RecordKind,
        record_number: &str,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool> {
        let taken: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(
                    SELECT 1
                    FROM {}
                    WHERE record_number = ?1
                      AND (?2 IS NULL OR id != ?2)
                );",
                kind.table()
            ),
            params![record_number, exclude_id],
            |row| row.get(0),
        )?;
        Ok(taken == 1)
    }

    fn record_exists(&self, record: RecordRef) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
                record.kind().table()
            ),
            [record.id()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn build_list_sql(select_sql: &str, query: &RecordListQuery) -> (String, Vec<Value>) {
    let mut sql = format!("{select_sql} WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        sql.push_str(" AND employee_id = ?");
        bind_values.push(Value::Integer(employee_id));
    }

    if let Some(range) = query.range {
        sql.push_str(" AND registration_date BETWEEN ? AND ?");
        bind_values.push(Value::Text(date_to_db(range.start())));
        bind_values.push(Value::Text(date_to_db(range.end())));
    }

    if let Some(text) = query.text.as_deref().map(str::trim) {
        if !text.is_empty() {
            sql.push_str(" AND (title LIKE ? OR record_number LIKE ? OR details LIKE ?)");
            let pattern = format!("%{text}%");
            for _ in 0..3 {
                bind_values.push(Value::Text(pattern.clone()));
            }
        }
    }

    sql.push_str(" ORDER BY registration_date DESC, id DESC");

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }
    } else if query.offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(query.offset)));
    }

    (sql, bind_values)
}

type RawRecord = (
    i64,
    String,
    String,
    String,
    String,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Reads by position; the outgoing select pads the type column so both
/// select lists share one shape.
fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
    ))
}

fn into_incoming(raw: RawRecord) -> RepoResult<IncomingRecord> {
    let (
        id,
        record_number,
        incoming_number,
        serial_number,
        title,
        source_id,
        type_id,
        employee_id,
        specialization_id,
        registration_date,
        details,
        created_date,
    ) = raw;
    Ok(IncomingRecord {
        id,
        record_number,
        incoming_number,
        serial_number,
        title,
        source_id,
        type_id,
        employee_id,
        specialization_id,
        registration_date: parse_date(registration_date, "incoming_records.registration_date"),
        details,
        created_date: parse_timestamp(created_date, "incoming_records.created_date"),
    })
}

fn into_outgoing(raw: RawRecord) -> RepoResult<OutgoingRecord> {
    let (
        id,
        record_number,
        outgoing_number,
        serial_number,
        title,
        destination_id,
        _,
        employee_id,
        specialization_id,
        registration_date,
        details,
        created_date,
    ) = raw;
    Ok(OutgoingRecord {
        id,
        record_number,
        outgoing_number,
        serial_number,
        title,
        destination_id,
        employee_id,
        specialization_id,
        registration_date: parse_date(registration_date, "outgoing_records.registration_date"),
        details,
        created_date: parse_timestamp(created_date, "outgoing_records.created_date"),
    })
}
