//! Environment-driven configuration.
//!
//! Deployment wiring stays outside the crate; this module only turns the
//! conventional environment variables into typed values.

use crate::task::adapters::postgres::TaskPgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use thiserror::Error;

/// Environment variable naming the `PostgreSQL` connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(String),
}

/// Database connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    database_url: String,
}

impl DatabaseConfig {
    /// Creates a configuration from an explicit connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] when `DATABASE_URL` is not
    /// set.
    pub fn from_env() -> Result<Self, ConfigError> {
        std::env::var(DATABASE_URL_VAR)
            .map(|database_url| Self { database_url })
            .map_err(|_| ConfigError::MissingVariable(DATABASE_URL_VAR))
    }

    /// Builds an r2d2 connection pool for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot be established.
    pub fn connect_pool(&self) -> Result<TaskPgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Pool::builder()
            .build(manager)
            .map_err(|err| ConfigError::Pool(err.to_string()))
    }
}
