//! System settings repository.

use super::{parse_timestamp, RepoResult};
use crate::model::{require_text, SystemSetting};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait SettingsRepository {
    fn get_setting(&self, key: &str) -> RepoResult<Option<SystemSetting>>;
    /// Inserts or replaces the value; an existing description is kept.
    fn set_setting(&self, key: &str, value: &str) -> RepoResult<()>;
    fn list_settings(&self) -> RepoResult<Vec<SystemSetting>>;
}

pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_setting(&self, key: &str) -> RepoResult<Option<SystemSetting>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, setting_key, setting_value, description, updated_date
                 FROM system_settings
                 WHERE setting_key = ?1;",
                [key],
                read_raw,
            )
            .optional()?;
        raw.map(into_setting).transpose()
    }

    fn set_setting(&self, key: &str, value: &str) -> RepoResult<()> {
        require_text(key, "setting_key")?;
        self.conn.execute(
            "INSERT INTO system_settings (setting_key, setting_value)
             VALUES (?1, ?2)
             ON CONFLICT(setting_key) DO UPDATE SET
                setting_value = excluded.setting_value,
                updated_date = CURRENT_TIMESTAMP;",
            params![key.trim(), value],
        )?;
        Ok(())
    }

    fn list_settings(&self) -> RepoResult<Vec<SystemSetting>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, setting_key, setting_value, description, updated_date
             FROM system_settings
             ORDER BY setting_key ASC;",
        )?;
        let rows = stmt.query_map([], read_raw)?;
        let mut settings = Vec::new();
        for raw in rows {
            settings.push(into_setting(raw?)?);
        }
        Ok(settings)
    }
}

type RawSetting = (i64, String, Option<String>, Option<String>, Option<String>);

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawSetting> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn into_setting(raw: RawSetting) -> RepoResult<SystemSetting> {
    let (id, key, value, description, updated_date) = raw;
    Ok(SystemSetting {
        id,
        key,
        value,
        description,
        updated_date: parse_timestamp(updated_date, "system_settings.updated_date"),
    })
}
