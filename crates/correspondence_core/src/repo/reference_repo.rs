//! Reference table repository.
//!
//! # Invariants
//! - Table names come only from [`ReferenceKind::table`].
//! - Names are unique per table; a duplicate insert fails with a DB error.

use super::{parse_timestamp, RepoError, RepoResult};
use crate::model::{require_text, ReferenceEntry, ReferenceKind};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait ReferenceRepository {
    fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> RepoResult<i64>;
    fn update_reference(
        &self,
        kind: ReferenceKind,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> RepoResult<()>;
    fn get_reference(&self, kind: ReferenceKind, id: i64) -> RepoResult<Option<ReferenceEntry>>;
    fn find_reference_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> RepoResult<Option<ReferenceEntry>>;
    /// Lists entries ordered by name.
    fn list_references(&self, kind: ReferenceKind) -> RepoResult<Vec<ReferenceEntry>>;
}

pub struct SqliteReferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReferenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReferenceRepository for SqliteReferenceRepository<'_> {
    fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> RepoResult<i64> {
        require_text(name, "name")?;
        self.conn.execute(
            &format!(
                "INSERT INTO {} (name, description) VALUES (?1, ?2);",
                kind.table()
            ),
            params![name.trim(), description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_reference(
        &self,
        kind: ReferenceKind,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> RepoResult<()> {
        require_text(name, "name")?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET name = ?1, description = ?2 WHERE id = ?3;",
                kind.table()
            ),
            params![name.trim(), description, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: kind.table(),
                id,
            });
        }
        Ok(())
    }

    fn get_reference(&self, kind: ReferenceKind, id: i64) -> RepoResult<Option<ReferenceEntry>> {
        let raw = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, name, description, created_date FROM {} WHERE id = ?1;",
                    kind.table()
                ),
                [id],
                read_raw,
            )
            .optional()?;
        raw.map(|raw| into_entry(kind, raw)).transpose()
    }

    fn find_reference_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> RepoResult<Option<ReferenceEntry>> {
        let raw = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, name, description, created_date FROM {} WHERE name = ?1;",
                    kind.table()
                ),
                [name],
                read_raw,
            )
            .optional()?;
        raw.map(|raw| into_entry(kind, raw)).transpose()
    }

    fn list_references(&self, kind: ReferenceKind) -> RepoResult<Vec<ReferenceEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, description, created_date FROM {} ORDER BY name ASC, id ASC;",
            kind.table()
        ))?;
        let rows = stmt.query_map([], read_raw)?;
        let mut entries = Vec::new();
        for raw in rows {
            entries.push(into_entry(kind, raw?)?);
        }
        Ok(entries)
    }
}

type RawReference = (i64, String, Option<String>, Option<String>);

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawReference> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_entry(kind: ReferenceKind, raw: RawReference) -> RepoResult<ReferenceEntry> {
    let (id, name, description, created_date) = raw;
    Ok(ReferenceEntry {
        id,
        kind,
        name,
        description,
        created_date: parse_timestamp(created_date, "created_date"),
    })
}
