//! Attachment repository.
//!
//! # Invariants
//! - An attachment is only inserted when its owner record exists.
//! - Rows only carry the path given by the file manager; no file is touched
//!   here.

use super::record_repo::{RecordRepository, SqliteRecordRepository};
use super::{parse_timestamp, RepoError, RepoResult};
use crate::model::{Attachment, NewAttachment, RecordKind, RecordRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ATTACHMENT_SELECT_SQL: &str = "SELECT
    id,
    record_id,
    record_type,
    file_name,
    file_path,
    file_size,
    file_type,
    upload_date,
    description
FROM attachments";

pub trait AttachmentRepository {
    fn add_attachment(&self, attachment: &NewAttachment) -> RepoResult<i64>;
    fn get_attachment(&self, id: i64) -> RepoResult<Option<Attachment>>;
    /// Lists attachments of one record, oldest first.
    fn list_attachments(&self, owner: RecordRef) -> RepoResult<Vec<Attachment>>;
    fn remove_attachment(&self, id: i64) -> RepoResult<()>;
}

pub struct SqliteAttachmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttachmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AttachmentRepository for SqliteAttachmentRepository<'_> {
    fn add_attachment(&self, attachment: &NewAttachment) -> RepoResult<i64> {
        attachment.validate()?;
        if !SqliteRecordRepository::new(self.conn).record_exists(attachment.owner)? {
            return Err(RepoError::MissingRecord(attachment.owner));
        }

        self.conn.execute(
            "INSERT INTO attachments (
                record_id,
                record_type,
                file_name,
                file_path,
                file_size,
                file_type,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                attachment.owner.id(),
                attachment.owner.kind().as_tag(),
                attachment.file_name.as_str(),
                attachment.file_path.as_str(),
                attachment.file_size,
                attachment.file_type.as_deref(),
                attachment.description.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_attachment(&self, id: i64) -> RepoResult<Option<Attachment>> {
        let raw = self
            .conn
            .query_row(
                &format!("{ATTACHMENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_raw,
            )
            .optional()?;
        raw.map(into_attachment).transpose()
    }

    fn list_attachments(&self, owner: RecordRef) -> RepoResult<Vec<Attachment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTACHMENT_SELECT_SQL}
             WHERE record_type = ?1
               AND record_id = ?2
             ORDER BY upload_date ASC, id ASC;"
        ))?;
        let rows = stmt.query_map(params![owner.kind().as_tag(), owner.id()], read_raw)?;
        let mut attachments = Vec::new();
        for raw in rows {
            attachments.push(into_attachment(raw?)?);
        }
        Ok(attachments)
    }

    fn remove_attachment(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM attachments WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "attachment",
                id,
            });
        }
        Ok(())
    }
}

type RawAttachment = (
    i64,
    i64,
    String,
    String,
    String,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawAttachment> {
    Ok((
        row.get("id")?,
        row.get("record_id")?,
        row.get("record_type")?,
        row.get("file_name")?,
        row.get("file_path")?,
        row.get("file_size")?,
        row.get("file_type")?,
        row.get("upload_date")?,
        row.get("description")?,
    ))
}

fn into_attachment(raw: RawAttachment) -> RepoResult<Attachment> {
    let (
        id,
        record_id,
        record_type,
        file_name,
        file_path,
        file_size,
        file_type,
        upload_date,
        description,
    ) = raw;
    let kind = RecordKind::from_tag(&record_type).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid record type `{record_type}` in attachments.record_type"
        ))
    })?;
    Ok(Attachment {
        id,
        owner: RecordRef::new(kind, record_id),
        file_name,
        file_path,
        file_size,
        file_type,
        upload_date: parse_timestamp(upload_date, "attachments.upload_date"),
        description,
    })
}
