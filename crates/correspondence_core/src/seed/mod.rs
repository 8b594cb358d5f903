//! Declarative default data for a fresh store.
//!
//! # Responsibility
//! - Describe default reference rows, employees and settings as data.
//! - Insert them idempotently at startup.
//!
//! # Invariants
//! - Reference rows and settings are keyed by their unique name/key.
//! - Seed employees carry fixed ids so repeated startups never duplicate them.
//! - Seeded contact info only fills empty columns; existing values win.

use crate::model::ReferenceKind;
use log::debug;
use rusqlite::{params, Connection};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const DEFAULT_SEED_JSON: &str = include_str!("default_seed.json");

/// Seed parsing/loading failure.
#[derive(Debug)]
pub enum SeedError {
    Read {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "failed to read seed `{path}`: {source}"),
            Self::Parse(err) => write!(f, "invalid seed document: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedReference {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedEmployee {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedSetting {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Complete seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub incoming_sources: Vec<SeedReference>,
    pub outgoing_destinations: Vec<SeedReference>,
    pub incoming_types: Vec<SeedReference>,
    pub specializations: Vec<SeedReference>,
    pub employees: Vec<SeedEmployee>,
    pub settings: Vec<SeedSetting>,
}

fn default_active() -> bool {
    true
}

impl SeedData {
    /// Built-in seed shipped with the crate.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_json(DEFAULT_SEED_JSON)
    }

    /// Seed that inserts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, SeedError> {
        serde_json::from_str(text).map_err(SeedError::Parse)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn references(&self, kind: ReferenceKind) -> &[SeedReference] {
        match kind {
            ReferenceKind::IncomingSource => &self.incoming_sources,
            ReferenceKind::OutgoingDestination => &self.outgoing_destinations,
            ReferenceKind::IncomingType => &self.incoming_types,
            ReferenceKind::Specialization => &self.specializations,
        }
    }

    /// Inserts every seed row that is not present yet.
    ///
    /// The contact-info update runs last and is best-effort: it fails quietly
    /// when the optional employee columns are missing.
    pub fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        for kind in ReferenceKind::ALL {
            let mut stmt = conn.prepare(&format!(
                "INSERT OR IGNORE INTO {} (name, description) VALUES (?1, ?2);",
                kind.table()
            ))?;
            for entry in self.references(kind) {
                stmt.execute(params![entry.name, entry.description])?;
            }
        }

        {
            let mut stmt = conn.prepare(
                "INSERT OR IGNORE INTO employees (id, name, department, position, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for employee in &self.employees {
                stmt.execute(params![
                    employee.id,
                    employee.name,
                    employee.department,
                    employee.position,
                    employee.is_active,
                ])?;
            }
        }

        if let Err(err) = self.apply_employee_contacts(conn) {
            debug!("event=seed_contacts module=seed status=skipped error={}", err);
        }

        let mut stmt = conn.prepare(
            "INSERT OR IGNORE INTO system_settings (setting_key, setting_value, description)
             VALUES (?1, ?2, ?3);",
        )?;
        for setting in &self.settings {
            stmt.execute(params![setting.key, setting.value, setting.description])?;
        }

        Ok(())
    }

    fn apply_employee_contacts(&self, conn: &Connection) -> rusqlite::Result<()> {
        let mut stmt = conn.prepare(
            "UPDATE employees
             SET
                email = COALESCE(email, ?1),
                phone = COALESCE(phone, ?2)
             WHERE id = ?3;",
        )?;
        for employee in &self.employees {
            if employee.email.is_none() && employee.phone.is_none() {
                continue;
            }
            stmt.execute(params![employee.email, employee.phone, employee.id])?;
        }
        Ok(())
    }
}
