use chrono::Local;
use clap::error::ErrorKind;
use clap::Parser;
use dotenv::dotenv;
use log::error;
use std::io;

use employee_registry::cli::{self, emit, Args, Command};
use employee_registry::db::{self, DbConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            emit(&mut out, format_args!("{}", err.to_string().trim_end()));
            return;
        }
    };

    // Bad input is reported without touching the database.
    let command = match Command::from_args(args.mode.as_deref(), &args.args) {
        Ok(command) => command,
        Err(err) => {
            emit(&mut out, format_args!("{}", err));
            return;
        }
    };

    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            emit(&mut out, format_args!("Error: {}", err));
            return;
        }
    };

    let pool = db::create_pool(&config);
    match db::probe(&pool).await {
        Ok(()) => {
            emit(&mut out, format_args!("DATABASE IS CONNECTED!"));
        }
        Err(err) => {
            emit(&mut out, format_args!("Failed to connect to database: {}", err));
        }
    }

    let today = Local::now().date_naive();
    if let Err(err) = cli::run(command, &pool, today, &mut out).await {
        error!("operation failed: {}", err);
        emit(&mut out, format_args!("Error: {}", err));
    }

    pool.close().await;
}
