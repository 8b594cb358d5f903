//! Reference (lookup) tables: sources, destinations, types, specializations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The four name/description lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    IncomingSource,
    OutgoingDestination,
    IncomingType,
    Specialization,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::IncomingSource,
        ReferenceKind::OutgoingDestination,
        ReferenceKind::IncomingType,
        ReferenceKind::Specialization,
    ];

    /// Backing table name. Only ever interpolated from this closed set.
    pub fn table(self) -> &'static str {
        match self {
            Self::IncomingSource => "incoming_sources",
            Self::OutgoingDestination => "outgoing_destinations",
            Self::IncomingType => "incoming_types",
            Self::Specialization => "specializations",
        }
    }
}

/// One row of a reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub id: i64,
    pub kind: ReferenceKind,
    /// Unique within its table.
    pub name: String,
    pub description: Option<String>,
    pub created_date: Option<NaiveDateTime>,
}
