pub mod service;

use log::{error, info};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool};
use std::env;
use std::str::FromStr;

use crate::errors::AppError;

/// Connection settings for the employee database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub pool_min: u32,
    pub pool_max: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database: "pmtk".to_string(),
            user: "root".to_string(),
            password: String::new(),
            host: "127.0.0.1".to_string(),
            port: 3307,
            pool_min: 0,
            pool_max: 640,
        }
    }
}

impl DbConfig {
    /// Reads `DB_*` variables from the process environment (and `.env`, once loaded).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            database: lookup("DB_NAME").unwrap_or(defaults.database),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "DB_PORT", defaults.port)?,
            pool_min: parse_var(&lookup, "DB_POOL_MIN", defaults.pool_min)?,
            pool_max: parse_var(&lookup, "DB_POOL_MAX", defaults.pool_max)?,
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidArguments(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

/// Builds the pool without opening a connection; connections are opened on first acquire.
pub fn create_pool(config: &DbConfig) -> MySqlPool {
    MySqlPoolOptions::new()
        .min_connections(config.pool_min)
        .max_connections(config.pool_max)
        .connect_lazy_with(config.connect_options())
}

pub async fn acquire(pool: &MySqlPool) -> Result<PoolConnection<MySql>, AppError> {
    pool.acquire()
        .await
        .map_err(|err| AppError::Connection(err.to_string()))
}

/// Opens and immediately releases one connection to check that the database is reachable.
pub async fn probe(pool: &MySqlPool) -> Result<(), AppError> {
    match acquire(pool).await {
        Ok(_connection) => {
            info!("database connection established");
            Ok(())
        }
        Err(err) => {
            error!("failed to connect to database: {}", err);
            Err(err)
        }
    }
}
