use std::fmt;
use std::io;

#[derive(Debug)]
pub enum AppError {
    InvalidArguments(String),
    Connection(String),
    Database(String),
    Output(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidArguments(msg) => write!(f, "Invalid Arguments: {}", msg),
            AppError::Connection(msg) => write!(f, "Connection Error: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Output(msg) => write!(f, "Output Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_failure_class() {
        let err = AppError::InvalidArguments("mode 2 expects 3 arguments".to_string());
        assert_eq!(err.to_string(), "Invalid Arguments: mode 2 expects 3 arguments");
    }

    #[test]
    fn sqlx_errors_become_database_errors() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
