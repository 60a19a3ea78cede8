//! Runtime configuration loaded from the environment.
//!
//! # Environment variables
//!
//! - `TASKMASTER_DATABASE_URL`: `PostgreSQL` connection string (optional for
//!   in-memory use, required by `taskmaster-admin`)
//! - `TASKMASTER_DB_POOL_SIZE`: connection pool size (default 10)
//! - `TASKMASTER_PAGE_SIZE`: page size for projects and tasks (default 20)
//! - `TASKMASTER_LARGE_PAGE_SIZE`: page size for comments and activity
//!   (default 50)
//! - `TASKMASTER_MAX_PAGE_SIZE`: upper bound on requested page sizes
//!   (default 100)
//! - `TASKMASTER_LOG`: tracing filter directive (default `taskmaster=info`)
//!
//! A `.env` file in the working directory is read first when present.

use crate::tracker::services::PaginationConfig;
use std::env;
use std::str::FromStr;
use thiserror::Error;

const DATABASE_URL: &str = "TASKMASTER_DATABASE_URL";
const DB_POOL_SIZE: &str = "TASKMASTER_DB_POOL_SIZE";
const PAGE_SIZE: &str = "TASKMASTER_PAGE_SIZE";
const LARGE_PAGE_SIZE: &str = "TASKMASTER_LARGE_PAGE_SIZE";
const MAX_PAGE_SIZE: &str = "TASKMASTER_MAX_PAGE_SIZE";
const LOG: &str = "TASKMASTER_LOG";

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_LOG_FILTER: &str = "taskmaster=info";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed as a number.
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// A size setting was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// A page size exceeds the configured maximum.
    #[error("{key} ({size}) exceeds {MAX_PAGE_SIZE} ({max})")]
    PageSizeAboveMax {
        /// Variable name.
        key: &'static str,
        /// Configured page size.
        size: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A required variable is unset.
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection string; `None` when no database is configured.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl DatabaseConfig {
    /// Returns the connection string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no URL is configured.
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        self.url.as_deref().ok_or(ConfigError::Missing(DATABASE_URL))
    }
}

/// Complete tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Listing page sizes.
    pub pagination: PaginationConfig,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl TrackerConfig {
    /// Loads configuration from the process environment, reading `.env`
    /// first when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is malformed or inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is malformed or inconsistent.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PaginationConfig::default();
        let pool_size = positive(lookup, DB_POOL_SIZE, DEFAULT_POOL_SIZE)?;
        let pagination = PaginationConfig {
            default_page_size: positive(lookup, PAGE_SIZE, defaults.default_page_size)?,
            large_page_size: positive(lookup, LARGE_PAGE_SIZE, defaults.large_page_size)?,
            max_page_size: positive(lookup, MAX_PAGE_SIZE, defaults.max_page_size)?,
        };
        for (key, size) in [
            (PAGE_SIZE, pagination.default_page_size),
            (LARGE_PAGE_SIZE, pagination.large_page_size),
        ] {
            if size > pagination.max_page_size {
                return Err(ConfigError::PageSizeAboveMax {
                    key,
                    size,
                    max: pagination.max_page_size,
                });
            }
        }

        Ok(Self {
            database: DatabaseConfig {
                url: lookup(DATABASE_URL).filter(|url| !url.trim().is_empty()),
                pool_size,
            },
            pagination,
            log_filter: lookup(LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
        })
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = u32::from_str(raw.trim()).map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.clone(),
    })?;
    if value == 0 {
        return Err(ConfigError::Zero(key));
    }
    Ok(value)
}
