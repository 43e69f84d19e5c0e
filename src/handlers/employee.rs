use chrono::NaiveDate;
use futures_util::{Stream, TryStreamExt};
use log::info;
use rand::Rng;
use sqlx::MySqlConnection;
use std::io::Write;
use std::time::Instant;

use crate::db::service::DatabaseService;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeRow, Gender};
use crate::utils::generator;

pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS Employees (
    ID INT PRIMARY KEY AUTO_INCREMENT,
    FullName VARCHAR(255),
    BirthDate DATE,
    Gender ENUM('Male', 'Female')
)";

pub const LIST_SQL: &str = "SELECT FullName, BirthDate, Gender FROM Employees ORDER BY FullName";

pub const SELECT_BY_CRITERIA_SQL: &str =
    "SELECT FullName, BirthDate, Gender FROM Employees WHERE FullName LIKE ? AND Gender = ?";

pub const CREATE_INDEX_SQL: &str =
    "CREATE INDEX idx_fullname_gender ON Employees (FullName, Gender)";

const PROGRESS_EVERY: usize = 100_000;

fn write_employee<W: Write>(out: &mut W, employee: &Employee, today: NaiveDate) -> Result<(), AppError> {
    writeln!(
        out,
        "{}, {}, {}, {} years.",
        employee.full_name,
        employee.birth_date.format("%Y-%m-%d"),
        employee.gender,
        employee.calculate_age(today)
    )?;
    Ok(())
}

/// Prints each streamed row as an employee line and returns how many were printed.
pub async fn write_rows<S, W>(mut rows: S, today: NaiveDate, out: &mut W) -> Result<usize, AppError>
where
    S: Stream<Item = Result<EmployeeRow, sqlx::Error>> + Unpin,
    W: Write,
{
    let mut printed = 0;
    while let Some(row) = rows.try_next().await? {
        let employee = Employee::try_from(row)?;
        write_employee(out, &employee, today)?;
        printed += 1;
    }
    Ok(printed)
}

/// Escapes LIKE wildcards so `prefix` matches literally.
pub fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub async fn create_table<W: Write>(conn: &mut MySqlConnection, out: &mut W) -> Result<(), AppError> {
    sqlx::query(CREATE_TABLE_SQL).execute(&mut *conn).await?;
    writeln!(out, "Employees table created.")?;
    Ok(())
}

pub async fn insert_employee<S, W>(
    service: &mut S,
    employee: &Employee,
    today: NaiveDate,
    out: &mut W,
) -> Result<(), AppError>
where
    S: DatabaseService + ?Sized,
    W: Write,
{
    let age = employee.calculate_age(today);
    writeln!(out, "Age of employee {}: {} years.", employee.full_name, age)?;
    employee.save(service).await
}

pub async fn list_employees<W: Write>(
    conn: &mut MySqlConnection,
    today: NaiveDate,
    out: &mut W,
) -> Result<(), AppError> {
    let rows = sqlx::query_as::<_, EmployeeRow>(LIST_SQL).fetch(&mut *conn);
    write_rows(rows, today, out).await?;
    Ok(())
}

/// Inserts `random_count` random employees followed by `prefixed_count` male employees
/// whose names start with `prefix`, one statement per row. Returns the number of rows written.
/// Rows written before a failure stay in the table.
pub async fn fill_employees<S, R>(
    service: &mut S,
    rng: &mut R,
    random_count: usize,
    prefixed_count: usize,
    prefix: &str,
) -> Result<usize, AppError>
where
    S: DatabaseService + ?Sized,
    R: Rng + ?Sized,
{
    let mut inserted = 0;
    for _ in 0..random_count {
        generator::random_employee(rng).save(service).await?;
        inserted += 1;
        if inserted % PROGRESS_EVERY == 0 {
            info!("inserted {} random employees", inserted);
        }
    }
    for _ in 0..prefixed_count {
        generator::prefixed_employee(rng, prefix).save(service).await?;
        inserted += 1;
    }
    info!("bulk fill finished: {} rows", inserted);
    Ok(inserted)
}

/// Runs the filtered select; the reported duration is measured from `started`,
/// which the caller takes before opening the connection.
pub async fn select_by_criteria<W: Write>(
    conn: &mut MySqlConnection,
    prefix: &str,
    gender: Gender,
    today: NaiveDate,
    started: Instant,
    out: &mut W,
) -> Result<(), AppError> {
    let rows = sqlx::query_as::<_, EmployeeRow>(SELECT_BY_CRITERIA_SQL)
        .bind(like_prefix(prefix))
        .bind(gender.as_str())
        .fetch(&mut *conn);
    write_rows(rows, today, out).await?;
    write_elapsed(out, started)
}

fn write_elapsed<W: Write>(out: &mut W, started: Instant) -> Result<(), AppError> {
    writeln!(out, "Query execution time: {} ms", started.elapsed().as_millis())?;
    Ok(())
}

pub async fn optimize<W: Write>(conn: &mut MySqlConnection, out: &mut W) -> Result<(), AppError> {
    sqlx::query(CREATE_INDEX_SQL).execute(&mut *conn).await?;
    writeln!(out, "Index on (FullName, Gender) created to speed up filtered selects.")?;
    Ok(())
}
