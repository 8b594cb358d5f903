//! Attachment model and its polymorphic record ownership.
//!
//! # Responsibility
//! - Replace the stored `(record_id, record_type)` tag pair with a sum type.
//!
//! # Invariants
//! - A [`RecordRef`] names exactly one record table.
//! - The referenced row must exist at insert time; the store checks this,
//!   the schema does not.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which record table an attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Incoming,
    Outgoing,
}

impl RecordKind {
    /// Tag persisted in `attachments.record_type`.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "incoming" => Some(Self::Incoming),
            "outgoing" => Some(Self::Outgoing),
            _ => None,
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Self::Incoming => "incoming_records",
            Self::Outgoing => "outgoing_records",
        }
    }
}

/// Reference to one incoming or outgoing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RecordRef {
    Incoming(i64),
    Outgoing(i64),
}

impl RecordRef {
    pub fn new(kind: RecordKind, id: i64) -> Self {
        match kind {
            RecordKind::Incoming => Self::Incoming(id),
            RecordKind::Outgoing => Self::Outgoing(id),
        }
    }

    pub fn kind(self) -> RecordKind {
        match self {
            Self::Incoming(_) => RecordKind::Incoming,
            Self::Outgoing(_) => RecordKind::Outgoing,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Incoming(id) | Self::Outgoing(id) => id,
        }
    }
}

/// Persisted attachment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub id: i64,
    pub owner: RecordRef,
    pub file_name: String,
    /// Path inside the managed attachments directory, as given by the file
    /// manager.
    pub file_path: String,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub upload_date: Option<NaiveDateTime>,
    pub description: Option<String>,
}

/// Tuple handed over by the file manager after it stored the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub owner: RecordRef,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub description: Option<String>,
}

impl NewAttachment {
    pub fn new(
        owner: RecordRef,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            file_name: file_name.into(),
            file_path: file_path.into(),
            file_size: None,
            file_type: None,
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), super::ValidationError> {
        super::require_text(&self.file_name, "file_name")?;
        super::require_text(&self.file_path, "file_path")
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordKind, RecordRef};

    #[test]
    fn record_kind_tags_are_stable() {
        for kind in [RecordKind::Incoming, RecordKind::Outgoing] {
            assert_eq!(RecordKind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(RecordKind::from_tag("Incoming"), None);
    }

    #[test]
    fn record_ref_exposes_kind_and_id() {
        let owner = RecordRef::new(RecordKind::Outgoing, 42);
        assert_eq!(owner, RecordRef::Outgoing(42));
        assert_eq!(owner.kind().table(), "outgoing_records");
        assert_eq!(owner.id(), 42);
    }
}
