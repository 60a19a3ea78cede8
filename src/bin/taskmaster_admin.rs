//! Administrative commands for a taskmaster `PostgreSQL` database.
//!
//! Usage:
//!
//! ```text
//! taskmaster-admin migrate
//! taskmaster-admin register-user <username> <email> [<first-name> <last-name>]
//! ```
//!
//! Connection settings come from `TASKMASTER_DATABASE_URL` and
//! `TASKMASTER_DB_POOL_SIZE` (see [`taskmaster::config`]).

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use taskmaster::config::TrackerConfig;
use taskmaster::telemetry;
use taskmaster::tracker::adapters::postgres::{PostgresTrackerStore, TrackerPgPool};
use taskmaster::tracker::services::{RegisterUserRequest, TrackerService};
use thiserror::Error;

const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-18-000000_create_tracker_tables/up.sql");

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum AdminError {
    #[error(
        "usage: taskmaster-admin migrate | register-user <username> <email> [<first> <last>]"
    )]
    Usage,
}

#[derive(Debug, PartialEq, Eq)]
enum AdminCommand {
    Migrate,
    RegisterUser(RegisterUserRequest),
}

fn parse_command(args: &[String]) -> Result<AdminCommand, AdminError> {
    match args {
        [command] if command == "migrate" => Ok(AdminCommand::Migrate),
        [command, username, email] if command == "register-user" => Ok(
            AdminCommand::RegisterUser(RegisterUserRequest::new(username, email)),
        ),
        [command, username, email, first, last] if command == "register-user" => {
            Ok(AdminCommand::RegisterUser(
                RegisterUserRequest::new(username, email).with_name(first, last),
            ))
        }
        _ => Err(AdminError::Usage),
    }
}

fn build_pool(config: &TrackerConfig) -> Result<TrackerPgPool, BoxError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database.require_url()?);
    let pool = Pool::builder()
        .max_size(config.database.pool_size)
        .build(manager)?;
    Ok(pool)
}

async fn migrate(pool: TrackerPgPool) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        let mut connection = pool.get()?;
        connection.batch_execute(SCHEMA_SQL)?;
        Ok(())
    })
    .await??;
    tracing::info!("tracker schema is up to date");
    Ok(())
}

async fn register_user(pool: TrackerPgPool, request: RegisterUserRequest) -> Result<(), BoxError> {
    let service = TrackerService::new(
        Arc::new(PostgresTrackerStore::new(pool)),
        Arc::new(DefaultClock),
    );
    let user = service.register_user(request).await?;
    tracing::info!(user_id = %user.id(), username = %user.username(), "user registered");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = TrackerConfig::from_env()?;
    telemetry::init(&config.log_filter)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args)?;
    let pool = build_pool(&config)?;

    match command {
        AdminCommand::Migrate => migrate(pool).await,
        AdminCommand::RegisterUser(request) => register_user(pool, request).await,
    }
}
