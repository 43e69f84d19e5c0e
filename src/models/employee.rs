use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::db::service::{BindValue, DatabaseService, WriteStatement};
use crate::errors::AppError;

pub const INSERT_EMPLOYEE_SQL: &str =
    "INSERT INTO Employees (FullName, BirthDate, Gender) VALUES (?, ?, ?)";

const BIRTH_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("male") {
            Ok(Gender::Male)
        } else if s.eq_ignore_ascii_case("female") {
            Ok(Gender::Female)
        } else {
            Err(AppError::InvalidArguments(format!(
                "gender must be either 'Male' or 'Female', got '{}'",
                s
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl Employee {
    pub fn new(full_name: impl Into<String>, birth_date: NaiveDate, gender: Gender) -> Self {
        Self {
            full_name: full_name.into(),
            birth_date,
            gender,
        }
    }

    /// Full years lived as of `today`.
    pub fn calculate_age(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.birth_date.year();
        if (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        age
    }

    pub fn insert_statement(&self) -> WriteStatement {
        WriteStatement::new(INSERT_EMPLOYEE_SQL)
            .bind(BindValue::Text(self.full_name.clone()))
            .bind(BindValue::Date(self.birth_date))
            .bind(BindValue::Text(self.gender.as_str().to_string()))
    }

    pub async fn save<S: DatabaseService + ?Sized>(&self, service: &mut S) -> Result<(), AppError> {
        service.execute(self.insert_statement()).await
    }
}

/// Row shape of the `Employees` table as selected by the listing queries.
#[derive(sqlx::FromRow, Debug)]
pub struct EmployeeRow {
    #[sqlx(rename = "FullName")]
    pub full_name: String,
    #[sqlx(rename = "BirthDate")]
    pub birth_date: NaiveDate,
    #[sqlx(rename = "Gender")]
    pub gender: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = AppError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let gender = row.gender.parse::<Gender>().map_err(|_| {
            AppError::Database(format!(
                "unexpected gender '{}' stored for '{}'",
                row.gender, row.full_name
            ))
        })?;
        Ok(Employee::new(row.full_name, row.birth_date, gender))
    }
}

pub fn parse_birth_date(input: &str) -> Result<NaiveDate, AppError> {
    let input = input.trim();
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .ok_or_else(|| {
            AppError::InvalidArguments(format!(
                "'{}' is not a valid birth date (expected YYYY-MM-DD)",
                input
            ))
        })
}
