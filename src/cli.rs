use chrono::NaiveDate;
use clap::Parser;
use log::error;
use sqlx::MySqlPool;
use std::fmt;
use std::io::Write;
use std::time::Instant;

use crate::db;
use crate::db::service::MySqlDatabaseService;
use crate::errors::AppError;
use crate::handlers::employee as ops;
use crate::models::employee::{Employee, Gender};
use crate::utils::validation::NewEmployee;

pub const RANDOM_EMPLOYEES: usize = 1_000_000;
pub const PREFIXED_EMPLOYEES: usize = 100;
pub const SELECT_PREFIX: &str = "F";
pub const SELECT_GENDER: Gender = Gender::Male;

/// Employee registry: runs one of six fixed operations against the Employees table.
///
/// Modes: 1 create table, 2 insert one (name, birth date, gender), 3 list all,
/// 4 bulk generate, 5 filtered select, 6 create index.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Operation mode (1-6)
    #[arg(value_name = "MODE", allow_hyphen_values = true)]
    pub mode: Option<String>,

    /// Extra arguments for the selected mode
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateTable,
    Insert(Employee),
    List,
    Fill,
    Select { prefix: String, gender: Gender },
    Optimize,
}

impl Command {
    /// Validates the mode and its arguments without touching the database.
    pub fn from_args(mode: Option<&str>, args: &[String]) -> Result<Self, AppError> {
        let mode = mode
            .ok_or_else(|| AppError::InvalidArguments("an operation mode (1-6) is required".to_string()))?;
        let mode: u8 = mode
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidArguments(format!("invalid mode '{}'", mode)))?;

        match mode {
            1 => Ok(Command::CreateTable),
            2 => match args {
                [full_name, birth_date, gender] => {
                    let employee = NewEmployee::from_args(full_name, birth_date, gender).into_employee()?;
                    Ok(Command::Insert(employee))
                }
                _ => Err(AppError::InvalidArguments(format!(
                    "mode 2 expects full name, birth date and gender, got {} argument(s)",
                    args.len()
                ))),
            },
            3 => Ok(Command::List),
            4 => Ok(Command::Fill),
            5 => Ok(Command::Select {
                prefix: SELECT_PREFIX.to_string(),
                gender: SELECT_GENDER,
            }),
            6 => Ok(Command::Optimize),
            other => Err(AppError::InvalidArguments(format!("unknown mode {}", other))),
        }
    }
}

/// Writes one line of user-facing output; a failed write is logged and reported as `false`.
pub fn emit<W: Write>(out: &mut W, line: fmt::Arguments<'_>) -> bool {
    match writeln!(out, "{}", line) {
        Ok(()) => true,
        Err(err) => {
            error!("failed to write output: {}", err);
            false
        }
    }
}

/// Runs one command on its own pooled connection, released when the command returns.
pub async fn run<W: Write>(
    command: Command,
    pool: &MySqlPool,
    today: NaiveDate,
    out: &mut W,
) -> Result<(), AppError> {
    // Mode 5 reports time spent opening the connection as part of the query.
    let started = Instant::now();
    let mut connection = db::acquire(pool).await?;

    match command {
        Command::CreateTable => ops::create_table(&mut connection, out).await,
        Command::Insert(employee) => {
            let mut service = MySqlDatabaseService::new(&mut connection);
            ops::insert_employee(&mut service, &employee, today, out).await
        }
        Command::List => ops::list_employees(&mut connection, today, out).await,
        Command::Fill => {
            let mut service = MySqlDatabaseService::new(&mut connection);
            let mut rng = rand::thread_rng();
            let inserted = ops::fill_employees(
                &mut service,
                &mut rng,
                RANDOM_EMPLOYEES,
                PREFIXED_EMPLOYEES,
                SELECT_PREFIX,
            )
            .await?;
            writeln!(out, "Inserted {} employees.", inserted)?;
            Ok(())
        }
        Command::Select { prefix, gender } => {
            ops::select_by_criteria(&mut connection, &prefix, gender, today, started, out).await
        }
        Command::Optimize => ops::optimize(&mut connection, out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numeric_modes_map_to_commands() {
        assert_eq!(Command::from_args(Some("1"), &[]).unwrap(), Command::CreateTable);
        assert_eq!(Command::from_args(Some("3"), &[]).unwrap(), Command::List);
        assert_eq!(Command::from_args(Some("4"), &[]).unwrap(), Command::Fill);
        assert_eq!(Command::from_args(Some("6"), &[]).unwrap(), Command::Optimize);
    }

    #[test]
    fn filtered_select_uses_fixed_criteria() {
        let command = Command::from_args(Some("5"), &strings(&["G", "Female"])).unwrap();
        assert_eq!(
            command,
            Command::Select {
                prefix: "F".to_string(),
                gender: Gender::Male,
            }
        );
    }

    #[test]
    fn insert_mode_builds_the_employee_and_its_age() {
        let command =
            Command::from_args(Some("2"), &strings(&["Ivanov Ivan", "2000-01-01", "Male"])).unwrap();
        let Command::Insert(employee) = command else {
            panic!("expected an insert command");
        };
        assert_eq!(employee.full_name, "Ivanov Ivan");
        assert_eq!(employee.calculate_age(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), 24);
    }

    #[test]
    fn insert_mode_with_two_arguments_is_rejected() {
        let err = Command::from_args(Some("2"), &strings(&["Ivanov Ivan", "2000-01-01"])).unwrap_err();
        assert!(matches!(err, AppError::InvalidArguments(_)));
        assert!(err.to_string().contains("got 2 argument(s)"));
    }

    #[test]
    fn missing_non_numeric_and_unknown_modes_are_rejected() {
        assert!(matches!(Command::from_args(None, &[]), Err(AppError::InvalidArguments(_))));
        assert!(matches!(Command::from_args(Some("list"), &[]), Err(AppError::InvalidArguments(_))));
        assert!(matches!(Command::from_args(Some("7"), &[]), Err(AppError::InvalidArguments(_))));
        assert!(matches!(Command::from_args(Some("0"), &[]), Err(AppError::InvalidArguments(_))));
    }

    #[test]
    fn clap_collects_mode_and_trailing_arguments() {
        let args = Args::try_parse_from(["employee_registry", "2", "Ivanov Ivan", "2000-01-01", "Male"]).unwrap();
        assert_eq!(args.mode.as_deref(), Some("2"));
        assert_eq!(args.args, strings(&["Ivanov Ivan", "2000-01-01", "Male"]));

        let args = Args::try_parse_from(["employee_registry"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn hyphenated_modes_reach_mode_validation() {
        let args = Args::try_parse_from(["employee_registry", "-1"]).unwrap();
        assert_eq!(args.mode.as_deref(), Some("-1"));

        let err = Command::from_args(args.mode.as_deref(), &args.args).unwrap_err();
        assert!(matches!(err, AppError::InvalidArguments(_)));
        assert_eq!(err.to_string(), "Invalid Arguments: invalid mode '-1'");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn emit_writes_a_line_and_reports_failed_writes() {
        let mut out = Vec::new();
        assert!(emit(&mut out, format_args!("DATABASE IS CONNECTED!")));
        assert_eq!(String::from_utf8(out).unwrap(), "DATABASE IS CONNECTED!\n");

        assert!(!emit(&mut BrokenPipe, format_args!("Error: {}", "lost")));
    }

    #[test]
    fn help_flag_is_still_recognized() {
        let err = Args::try_parse_from(["employee_registry", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
