//! Employee activity statistics and date range filter.
//!
//! # Invariants
//! - `total == fax_count + email_count`.
//! - A [`DateRange`] always carries both bounds; both are inclusive.
//! - Email matching is a case-sensitive substring test against
//!   [`EMAIL_TYPE_KEYWORDS`].

use super::ValidationError;
use chrono::NaiveDate;
use serde::Serialize;

/// Substrings marking an incoming type as email correspondence.
pub const EMAIL_TYPE_KEYWORDS: [&str; 2] = ["email", "إيميل"];

/// Derived activity counters for one employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeStats {
    /// Outgoing records handled by the employee.
    pub fax_count: i64,
    /// Incoming records of an email type handled by the employee.
    pub email_count: i64,
    pub total: i64,
}

impl EmployeeStats {
    pub fn new(fax_count: i64, email_count: i64) -> Self {
        Self {
            fax_count,
            email_count,
            total: fax_count + email_count,
        }
    }

    /// Failure value: all counters zero.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Inclusive registration date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange);
        }
        Ok(Self { start, end })
    }

    /// Builds a range only when both bounds are present and ordered.
    ///
    /// A half-open pair is ignored as a whole rather than widened.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).ok(),
            _ => None,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn half_open_bounds_are_ignored() {
        assert!(DateRange::from_bounds(Some(date(2024, 1, 1)), None).is_none());
        assert!(DateRange::from_bounds(None, Some(date(2024, 1, 1))).is_none());
        assert!(DateRange::from_bounds(None, None).is_none());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            DateRange::new(date(2024, 2, 1), date(2024, 1, 1)),
            Err(ValidationError::InvertedRange)
        );
        assert!(DateRange::from_bounds(Some(date(2024, 2, 1)), Some(date(2024, 1, 1))).is_none());
    }

    #[test]
    fn stats_total_is_sum() {
        let stats = EmployeeStats::new(3, 2);
        assert_eq!(stats.total, 5);
        assert_eq!(EmployeeStats::zero().total, 0);
    }
}
