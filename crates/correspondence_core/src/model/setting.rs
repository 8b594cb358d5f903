//! Flat key-value system settings.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Text value meaning "enabled" for boolean settings.
pub const SETTING_TRUE: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemSetting {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub updated_date: Option<NaiveDateTime>,
}

impl SystemSetting {
    /// Interprets the value as a flag; only the exact text `"1"` is true.
    pub fn as_flag(&self) -> bool {
        self.value.as_deref() == Some(SETTING_TRUE)
    }
}
