//! Reference tables and system settings.

use super::CorrespondenceStore;
use crate::model::{ReferenceEntry, ReferenceKind, SystemSetting};
use crate::repo::reference_repo::{ReferenceRepository, SqliteReferenceRepository};
use crate::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};

impl CorrespondenceStore {
    pub fn references(&self, kind: ReferenceKind) -> Option<Vec<ReferenceEntry>> {
        self.run("reference_list", |conn| {
            SqliteReferenceRepository::new(conn).list_references(kind)
        })
    }

    pub fn reference(&self, kind: ReferenceKind, id: i64) -> Option<ReferenceEntry> {
        self.run("reference_get", |conn| {
            SqliteReferenceRepository::new(conn).get_reference(kind, id)
        })
        .flatten()
    }

    pub fn find_reference(&self, kind: ReferenceKind, name: &str) -> Option<ReferenceEntry> {
        self.run("reference_find", |conn| {
            SqliteReferenceRepository::new(conn).find_reference_by_name(kind, name)
        })
        .flatten()
    }

    /// Inserts a reference entry. A duplicate name yields `None`.
    pub fn add_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> Option<i64> {
        self.run("reference_create", |conn| {
            SqliteReferenceRepository::new(conn).create_reference(kind, name, description)
        })
    }

    pub fn update_reference(
        &self,
        kind: ReferenceKind,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> bool {
        self.run("reference_update", |conn| {
            SqliteReferenceRepository::new(conn).update_reference(kind, id, name, description)
        })
        .is_some()
    }

    /// Raw setting value; callers parse it.
    pub fn setting(&self, key: &str) -> Option<String> {
        self.run("setting_get", |conn| {
            SqliteSettingsRepository::new(conn).get_setting(key)
        })
        .flatten()
        .and_then(|setting| setting.value)
    }

    /// `true` only when the setting exists and holds the text `"1"`.
    pub fn setting_flag(&self, key: &str) -> bool {
        self.run("setting_get", |conn| {
            SqliteSettingsRepository::new(conn).get_setting(key)
        })
        .flatten()
        .is_some_and(|setting| setting.as_flag())
    }

    pub fn set_setting(&self, key: &str, value: &str) -> bool {
        self.run("setting_set", |conn| {
            SqliteSettingsRepository::new(conn).set_setting(key, value)
        })
        .is_some()
    }

    pub fn settings(&self) -> Option<Vec<SystemSetting>> {
        self.run("setting_list", |conn| {
            SqliteSettingsRepository::new(conn).list_settings()
        })
    }
}
