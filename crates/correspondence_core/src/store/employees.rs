//! Employee access and activity counters.

use super::CorrespondenceStore;
use crate::model::{DateRange, Employee, EmployeeStats, NewEmployee};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::RepoResult;
use log::debug;
use serde::Serialize;

/// One line of the per-employee activity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeActivity {
    pub employee: Employee,
    pub stats: EmployeeStats,
}

impl CorrespondenceStore {
    /// Counts outgoing (fax) and email-typed incoming records for one
    /// employee, optionally restricted to an inclusive date range.
    ///
    /// Returns all-zero stats on any failure.
    pub fn get_employee_stats(&self, employee_id: i64, range: Option<DateRange>) -> EmployeeStats {
        self.run("employee_stats", |conn| {
            SqliteEmployeeRepository::try_new(conn)?.employee_stats(employee_id, range.as_ref())
        })
        .unwrap_or_else(EmployeeStats::zero)
    }

    /// Recomputes the cached counters of one employee and stores them.
    ///
    /// Counter columns are looked up in live table metadata on every call.
    /// When they are missing nothing is written and the call still succeeds.
    pub fn update_employee_counts(&self, employee_id: i64) -> bool {
        self.run("employee_counts_update", |conn| {
            let repo = SqliteEmployeeRepository::try_new(conn)?;
            let stats = repo.employee_stats(employee_id, None)?;
            if !repo.write_employee_counts(employee_id, &stats)? {
                debug!(
                    "event=employee_counts_update module=store status=skipped employee_id={} reason=missing_columns",
                    employee_id
                );
            }
            Ok(())
        })
        .is_some()
    }

    /// Recomputes cached counters for every employee.
    pub fn refresh_all_employee_counts(&self) -> bool {
        self.run("employee_counts_refresh_all", |conn| {
            let repo = SqliteEmployeeRepository::try_new(conn)?;
            for employee in repo.list_employees(false)? {
                let stats = repo.employee_stats(employee.id, None)?;
                repo.write_employee_counts(employee.id, &stats)?;
            }
            Ok(())
        })
        .is_some()
    }

    /// Live stats for every employee, ordered by name.
    pub fn employee_activity_report(
        &self,
        range: Option<DateRange>,
        active_only: bool,
    ) -> Option<Vec<EmployeeActivity>> {
        self.run("employee_activity_report", |conn| {
            let repo = SqliteEmployeeRepository::try_new(conn)?;
            repo.list_employees(active_only)?
                .into_iter()
                .map(|employee| -> RepoResult<EmployeeActivity> {
                    let stats = repo.employee_stats(employee.id, range.as_ref())?;
                    Ok(EmployeeActivity { employee, stats })
                })
                .collect()
        })
    }

    pub fn add_employee(&self, employee: &NewEmployee) -> Option<i64> {
        self.run("employee_create", |conn| {
            SqliteEmployeeRepository::try_new(conn)?.create_employee(employee)
        })
    }

    pub fn update_employee(&self, id: i64, employee: &NewEmployee) -> bool {
        self.run("employee_update", |conn| {
            SqliteEmployeeRepository::try_new(conn)?.update_employee(id, employee)
        })
        .is_some()
    }

    pub fn set_employee_active(&self, id: i64, is_active: bool) -> bool {
        self.run("employee_set_active", |conn| {
            SqliteEmployeeRepository::try_new(conn)?.set_employee_active(id, is_active)
        })
        .is_some()
    }

    /// Returns `None` when the employee is missing or the read failed.
    pub fn employee(&self, id: i64) -> Option<Employee> {
        self.run("employee_get", |conn| {
            SqliteEmployeeRepository::try_new(conn)?.get_employee(id)
        })
        .flatten()
    }

    pub fn employees(&self, active_only: bool) -> Option<Vec<Employee>> {
        self.run("employee_list", |conn| {
            SqliteEmployeeRepository::try_new(conn)?.list_employees(active_only)
        })
    }
}
