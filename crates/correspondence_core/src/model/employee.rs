//! Employee model.
//!
//! # Invariants
//! - `fax_count` and `email_count` are caches; the source of truth is the
//!   record tables (see [`crate::model::stats`]).
//! - Optional columns may be missing on degraded databases; reads then
//!   surface `None`/`0`.

use super::{require_text, ValidationError};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Persisted employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Cached count of outgoing records.
    pub fax_count: i64,
    /// Cached count of email-typed incoming records.
    pub email_count: i64,
    pub created_date: Option<NaiveDateTime>,
}

/// Input for creating or updating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewEmployee {
    /// Active employee with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: None,
            position: None,
            is_active: true,
            email: None,
            phone: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")?;
        if let Some(email) = self.email.as_deref() {
            let email = email.trim();
            if !email.is_empty() && !EMAIL_RE.is_match(email) {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::NewEmployee;
    use crate::model::ValidationError;

    #[test]
    fn validate_rejects_blank_name() {
        let employee = NewEmployee::new("   ");
        assert_eq!(
            employee.validate(),
            Err(ValidationError::EmptyField("name"))
        );
    }

    #[test]
    fn validate_checks_email_shape_only_when_present() {
        let mut employee = NewEmployee::new("Layla");
        assert!(employee.validate().is_ok());

        employee.email = Some("layla@example.org".to_string());
        assert!(employee.validate().is_ok());

        employee.email = Some("not-an-address".to_string());
        assert!(matches!(
            employee.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }
}
