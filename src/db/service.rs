use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use sqlx::MySqlConnection;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Date(NaiveDate),
}

/// A write statement with positional `?` placeholders and the values bound to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStatement {
    pub sql: &'static str,
    pub binds: Vec<BindValue>,
}

impl WriteStatement {
    pub fn new(sql: &'static str) -> Self {
        Self {
            sql,
            binds: Vec::new(),
        }
    }

    pub fn bind(mut self, value: BindValue) -> Self {
        self.binds.push(value);
        self
    }
}

#[async_trait]
pub trait DatabaseService: Send {
    async fn execute(&mut self, statement: WriteStatement) -> Result<(), AppError>;
}

/// Executes statements on a connection borrowed for the duration of one operation.
pub struct MySqlDatabaseService<'c> {
    connection: &'c mut MySqlConnection,
}

impl<'c> MySqlDatabaseService<'c> {
    pub fn new(connection: &'c mut MySqlConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl<'c> DatabaseService for MySqlDatabaseService<'c> {
    async fn execute(&mut self, statement: WriteStatement) -> Result<(), AppError> {
        debug!("executing: {}", statement.sql);
        let mut query = sqlx::query(statement.sql);
        for value in statement.binds {
            query = match value {
                BindValue::Text(text) => query.bind(text),
                BindValue::Date(date) => query.bind(date),
            };
        }
        query.execute(&mut *self.connection).await?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingService {
    pub executed: Vec<WriteStatement>,
    pub fail_after: Option<usize>,
}

#[cfg(test)]
#[async_trait]
impl DatabaseService for RecordingService {
    async fn execute(&mut self, statement: WriteStatement) -> Result<(), AppError> {
        if self.fail_after == Some(self.executed.len()) {
            return Err(AppError::Database("Duplicate entry".to_string()));
        }
        self.executed.push(statement);
        Ok(())
    }
}

/// Counts statements without keeping them; used for the full-size bulk run.
#[cfg(test)]
#[derive(Default)]
pub struct CountingService {
    pub count: usize,
}

#[cfg(test)]
#[async_trait]
impl DatabaseService for CountingService {
    async fn execute(&mut self, _statement: WriteStatement) -> Result<(), AppError> {
        self.count += 1;
        Ok(())
    }
}
