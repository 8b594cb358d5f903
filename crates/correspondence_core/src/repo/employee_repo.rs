//! Employee repository and activity statistics.
//!
//! # Responsibility
//! - CRUD over `employees`, tolerant of databases missing optional columns.
//! - Count outgoing and email-typed incoming records per employee.
//! - Persist the cached counters when the columns exist.
//!
//! # Invariants
//! - Optional column presence is read from live metadata when the repository
//!   is constructed; construct one per call.
//! - Stats never read the cached counters; they always recount.

use super::{bool_to_int, date_to_db, parse_timestamp, RepoError, RepoResult};
use crate::db::migrations::table_has_column;
use crate::model::{DateRange, Employee, EmployeeStats, NewEmployee, EMAIL_TYPE_KEYWORDS};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub trait EmployeeRepository {
    fn create_employee(&self, employee: &NewEmployee) -> RepoResult<i64>;
    fn update_employee(&self, id: i64, employee: &NewEmployee) -> RepoResult<()>;
    fn set_employee_active(&self, id: i64, is_active: bool) -> RepoResult<()>;
    fn get_employee(&self, id: i64) -> RepoResult<Option<Employee>>;
    /// Lists employees ordered by name.
    fn list_employees(&self, active_only: bool) -> RepoResult<Vec<Employee>>;
    /// Recounts activity for one employee, optionally within a date range.
    fn employee_stats(&self, id: i64, range: Option<&DateRange>) -> RepoResult<EmployeeStats>;
    /// Writes cached counters back.
    ///
    /// Returns `Ok(false)` without writing when either counter column is
    /// missing.
    fn write_employee_counts(&self, id: i64, stats: &EmployeeStats) -> RepoResult<bool>;
}

/// Which optional `employees` columns exist right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeColumns {
    pub email: bool,
    pub phone: bool,
    pub fax_count: bool,
    pub email_count: bool,
}

impl EmployeeColumns {
    pub fn detect(conn: &Connection) -> RepoResult<Self> {
        Ok(Self {
            email: table_has_column(conn, "employees", "email")?,
            phone: table_has_column(conn, "employees", "phone")?,
            fax_count: table_has_column(conn, "employees", "fax_count")?,
            email_count: table_has_column(conn, "employees", "email_count")?,
        })
    }

    pub fn has_counters(&self) -> bool {
        self.fax_count && self.email_count
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT
                id,
                name,
                department,
                position,
                is_active,
                {} AS email,
                {} AS phone,
                {} AS fax_count,
                {} AS email_count,
                created_date
            FROM employees",
            if self.email { "email" } else { "NULL" },
            if self.phone { "phone" } else { "NULL" },
            if self.fax_count { "fax_count" } else { "0" },
            if self.email_count { "email_count" } else { "0" },
        )
    }
}

pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
    columns: EmployeeColumns,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates a repository after inspecting the live `employees` columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let columns = EmployeeColumns::detect(conn)?;
        Ok(Self { conn, columns })
    }

    pub fn columns(&self) -> EmployeeColumns {
        self.columns
    }

    fn write_contacts(&self, id: i64, employee: &NewEmployee) -> RepoResult<()> {
        if self.columns.email {
            self.conn.execute(
                "UPDATE employees SET email = ?1 WHERE id = ?2;",
                params![employee.email.as_deref().map(str::trim), id],
            )?;
        }
        if self.columns.phone {
            self.conn.execute(
                "UPDATE employees SET phone = ?1 WHERE id = ?2;",
                params![employee.phone.as_deref(), id],
            )?;
        }
        Ok(())
    }

    fn count(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row(sql, params_from_iter(bind_values), |row| row.get(0))?;
        Ok(count)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &NewEmployee) -> RepoResult<i64> {
        employee.validate()?;
        self.conn.execute(
            "INSERT INTO employees (name, department, position, is_active)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                employee.name.trim(),
                employee.department.as_deref(),
                employee.position.as_deref(),
                bool_to_int(employee.is_active),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.write_contacts(id, employee)?;
        Ok(id)
    }

    fn update_employee(&self, id: i64, employee: &NewEmployee) -> RepoResult<()> {
        employee.validate()?;
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                department = ?2,
                position = ?3,
                is_active = ?4
             WHERE id = ?5;",
            params![
                employee.name.trim(),
                employee.department.as_deref(),
                employee.position.as_deref(),
                bool_to_int(employee.is_active),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                id,
            });
        }
        self.write_contacts(id, employee)
    }

    fn set_employee_active(&self, id: i64, is_active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE employees SET is_active = ?1 WHERE id = ?2;",
            params![bool_to_int(is_active), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                id,
            });
        }
        Ok(())
    }

    fn get_employee(&self, id: i64) -> RepoResult<Option<Employee>> {
        let sql = format!("{} WHERE id = ?1;", self.columns.select_sql());
        let raw = self.conn.query_row(&sql, [id], read_raw).optional()?;
        raw.map(into_employee).transpose()
    }

    fn list_employees(&self, active_only: bool) -> RepoResult<Vec<Employee>> {
        let mut sql = self.columns.select_sql();
        if active_only {
            sql.push_str(" WHERE COALESCE(is_active, 0) != 0");
        }
        sql.push_str(" ORDER BY name ASC, id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_raw)?;
        let mut employees = Vec::new();
        for raw in rows {
            employees.push(into_employee(raw?)?);
        }
        Ok(employees)
    }

    fn employee_stats(&self, id: i64, range: Option<&DateRange>) -> RepoResult<EmployeeStats> {
        let mut fax_sql = String::from(
            "SELECT COUNT(*)
             FROM outgoing_records
             WHERE employee_id = ?",
        );
        let mut fax_values = vec![Value::Integer(id)];

        let mut email_sql = String::from(
            "SELECT COUNT(*)
             FROM incoming_records
             WHERE employee_id = ?
               AND incoming_type_id IN (
                   SELECT id
                   FROM incoming_types
                   WHERE instr(name, ?) > 0 OR instr(name, ?) > 0
               )",
        );
        let mut email_values = vec![Value::Integer(id)];
        email_values.extend(
            EMAIL_TYPE_KEYWORDS
                .iter()
                .map(|keyword| Value::Text((*keyword).to_string())),
        );

        if let Some(range) = range {
            for (sql, values) in [
                (&mut fax_sql, &mut fax_values),
                (&mut email_sql, &mut email_values),
            ] {
                sql.push_str(" AND registration_date BETWEEN ? AND ?");
                values.push(Value::Text(date_to_db(range.start())));
                values.push(Value::Text(date_to_db(range.end())));
            }
        }

        let fax_count = self.count(&fax_sql, fax_values)?;
        let email_count = self.count(&email_sql, email_values)?;
        Ok(EmployeeStats::new(fax_count, email_count))
    }

    fn write_employee_counts(&self, id: i64, stats: &EmployeeStats) -> RepoResult<bool> {
        if !self.columns.has_counters() {
            return Ok(false);
        }
        self.conn.execute(
            "UPDATE employees SET fax_count = ?1, email_count = ?2 WHERE id = ?3;",
            params![stats.fax_count, stats.email_count, id],
        )?;
        Ok(true)
    }
}

type RawEmployee = (
    i64,
    String,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<String>,
);

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawEmployee> {
    Ok((
        row.get("id")?,
        row.get("name")?,
        row.get("department")?,
        row.get("position")?,
        row.get("is_active")?,
        row.get("email")?,
        row.get("phone")?,
        row.get("fax_count")?,
        row.get("email_count")?,
        row.get("created_date")?,
    ))
}

fn into_employee(raw: RawEmployee) -> RepoResult<Employee> {
    let (
        id,
        name,
        department,
        position,
        is_active,
        email,
        phone,
        fax_count,
        email_count,
        created_date,
    ) = raw;
    Ok(Employee {
        id,
        name,
        department,
        position,
        is_active: is_active.unwrap_or(0) != 0,
        email,
        phone,
        fax_count: fax_count.unwrap_or(0),
        email_count: email_count.unwrap_or(0),
        created_date: parse_timestamp(created_date, "employees.created_date"),
    })
}
