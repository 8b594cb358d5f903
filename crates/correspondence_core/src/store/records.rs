//! Record and attachment access.

use super::CorrespondenceStore;
use crate::model::{
    Attachment, IncomingRecord, IncomingRecordInput, NewAttachment, OutgoingRecord,
    OutgoingRecordInput, RecordKind, RecordRef,
};
use crate::repo::attachment_repo::{AttachmentRepository, SqliteAttachmentRepository};
use crate::repo::record_repo::{RecordListQuery, RecordRepository, SqliteRecordRepository};

impl CorrespondenceStore {
    /// Inserts an incoming record. A reused record number yields `None`.
    pub fn add_incoming(&self, input: &IncomingRecordInput) -> Option<i64> {
        self.run("incoming_create", |conn| {
            SqliteRecordRepository::new(conn).create_incoming(input)
        })
    }

    pub fn update_incoming(&self, id: i64, input: &IncomingRecordInput) -> bool {
        self.run("incoming_update", |conn| {
            SqliteRecordRepository::new(conn).update_incoming(id, input)
        })
        .is_some()
    }

    pub fn incoming(&self, id: i64) -> Option<IncomingRecord> {
        self.run("incoming_get", |conn| {
            SqliteRecordRepository::new(conn).get_incoming(id)
        })
        .flatten()
    }

    pub fn list_incoming(&self, query: &RecordListQuery) -> Option<Vec<IncomingRecord>> {
        self.run("incoming_list", |conn| {
            SqliteRecordRepository::new(conn).list_incoming(query)
        })
    }

    /// Inserts an outgoing record. A reused record number yields `None`.
    pub fn add_outgoing(&self, input: &OutgoingRecordInput) -> Option<i64> {
        self.run("outgoing_create", |conn| {
            SqliteRecordRepository::new(conn).create_outgoing(input)
        })
    }

    pub fn update_outgoing(&self, id: i64, input: &OutgoingRecordInput) -> bool {
        self.run("outgoing_update", |conn| {
            SqliteRecordRepository::new(conn).update_outgoing(id, input)
        })
        .is_some()
    }

    pub fn outgoing(&self, id: i64) -> Option<OutgoingRecord> {
        self.run("outgoing_get", |conn| {
            SqliteRecordRepository::new(conn).get_outgoing(id)
        })
        .flatten()
    }

    pub fn list_outgoing(&self, query: &RecordListQuery) -> Option<Vec<OutgoingRecord>> {
        self.run("outgoing_list", |conn| {
            SqliteRecordRepository::new(conn).list_outgoing(query)
        })
    }

    /// `None` means the lookup itself failed, not that the number is free.
    pub fn record_number_exists(&self, kind: RecordKind, record_number: &str) -> Option<bool> {
        self.run("record_number_exists", |conn| {
            SqliteRecordRepository::new(conn).record_number_taken(kind, record_number.trim(), None)
        })
    }

    /// Persists the tuple produced by the file manager.
    ///
    /// Returns `None` when the owner record does not exist.
    pub fn add_attachment(&self, attachment: &NewAttachment) -> Option<i64> {
        self.run("attachment_create", |conn| {
            SqliteAttachmentRepository::new(conn).add_attachment(attachment)
        })
    }

    pub fn attachment(&self, id: i64) -> Option<Attachment> {
        self.run("attachment_get", |conn| {
            SqliteAttachmentRepository::new(conn).get_attachment(id)
        })
        .flatten()
    }

    pub fn attachments(&self, owner: RecordRef) -> Option<Vec<Attachment>> {
        self.run("attachment_list", |conn| {
            SqliteAttachmentRepository::new(conn).list_attachments(owner)
        })
    }

    /// Removes the attachment row only; the backing file belongs to the
    /// file manager.
    pub fn remove_attachment(&self, id: i64) -> bool {
        self.run("attachment_remove", |conn| {
            SqliteAttachmentRepository::new(conn).remove_attachment(id)
        })
        .is_some()
    }
}
