//! Core data access for the correspondence archive.
//! Everything above this crate talks to the database through
//! [`CorrespondenceStore`].

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod store;

pub use config::{StoreConfig, StoreLayout};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Attachment, DateRange, Employee, EmployeeStats, IncomingRecord, IncomingRecordInput,
    NewAttachment, NewEmployee, OutgoingRecord, OutgoingRecordInput, RecordKind, RecordRef,
    ReferenceEntry, ReferenceKind, SystemSetting, ValidationError,
};
pub use repo::record_repo::RecordListQuery;
pub use repo::{RepoError, RepoResult};
pub use seed::{SeedData, SeedError};
pub use store::{CorrespondenceStore, EmployeeActivity, ExecOutcome, QueryRow};

/// Minimal health-check API for the CLI binary.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
