//! Connection pool configuration for the document store.
//!
//! The store reads no environment variables. Host services embed a
//! [`StoreConfig`] section in their own configuration and hand it over
//! already parsed, or pass the raw TOML fragment to
//! [`StoreConfig::from_toml_str`].

use crate::document::adapters::postgres::DocumentPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Database settings for the document store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing.
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum StoreConfigError {
    /// The TOML fragment could not be parsed.
    #[error("invalid store configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The database URL is empty.
    #[error("database_url must not be empty")]
    EmptyDatabaseUrl,

    /// The pool was configured with no connections.
    #[error("max_connections must be at least 1")]
    ZeroConnections,

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

const fn default_connection_timeout_secs() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

impl StoreConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
        }
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the pool checkout timeout.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout_secs = timeout.as_secs();
        self
    }

    /// Parses and validates a TOML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError::Parse`] for malformed TOML and the
    /// validation errors of [`StoreConfig::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self, StoreConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings without connecting.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError::EmptyDatabaseUrl`] or
    /// [`StoreConfigError::ZeroConnections`].
    pub fn validate(&self) -> Result<(), StoreConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(StoreConfigError::EmptyDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(StoreConfigError::ZeroConnections);
        }
        Ok(())
    }

    /// Returns the pool checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Builds the `PostgreSQL` connection pool.
    ///
    /// The pool is built lazily: no connection is opened until the first
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns a validation error or [`StoreConfigError::Pool`].
    pub fn build_pool(&self) -> Result<DocumentPgPool, StoreConfigError> {
        self.validate()?;
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Ok(Pool::builder()
            .max_size(self.max_connections)
            .min_idle(Some(0))
            .connection_timeout(self.connection_timeout())
            .build(manager)?)
    }
}
