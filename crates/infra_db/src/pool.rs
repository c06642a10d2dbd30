//! Database connection pool management
//!
//! This module provides connection pool configuration and creation for both
//! supported backends, and [`connect_store`], which turns a configuration
//! into a ready-to-use history store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use domain_claims::HistoryStore;

use crate::error::DatabaseError;
use crate::stores::{PostgresHistoryStore, SqliteHistoryStore};

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

impl FromStr for DatabaseBackend {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseBackend::Sqlite),
            "postgresql" | "postgres" => Ok(DatabaseBackend::Postgres),
            other => Err(DatabaseError::InvalidConfig(format!(
                "unsupported database type '{other}' (expected 'sqlite' or 'postgresql')"
            ))),
        }
    }
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseBackend::Sqlite => f.write_str("sqlite"),
            DatabaseBackend::Postgres => f.write_str("postgresql"),
        }
    }
}

/// Configuration options for the database connection pool
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use infra_db::{DatabaseBackend, DatabaseConfig};
///
/// let config = DatabaseConfig::new(DatabaseBackend::Postgres, "postgres://localhost/claims")
///     .max_connections(20)
///     .statement_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Which store implementation to build
    pub backend: DatabaseBackend,
    /// Connection string
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
    /// Idle timeout before closing a connection
    pub idle_timeout: Duration,
    /// Server-side limit per statement (PostgreSQL only)
    pub statement_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a new database configuration with sensible pool defaults
    pub fn new(backend: DatabaseBackend, url: impl Into<String>) -> Self {
        Self {
            backend,
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60), // 30 minutes
            idle_timeout: Duration::from_secs(10 * 60), // 10 minutes
            statement_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the maximum number of connections in the pool (default: 10)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections to maintain (default: 1)
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout duration (default: 30s)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the maximum lifetime of a connection (default: 30 min)
    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Sets the idle timeout before closing a connection (default: 10 min)
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the per-statement timeout (default: 5s)
    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DatabaseBackend::Sqlite, "sqlite://claims_history.db")
    }
}

/// Creates a PostgreSQL pool with `statement_timeout` set on every connection
pub async fn create_pg_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    info!(
        "Creating PostgreSQL pool with max_connections={}, min_connections={}",
        config.max_connections, config.min_connections
    );

    let timeout_ms = config.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| DatabaseError::InvalidConfig(e.to_string()))?
        .options([("statement_timeout", timeout_ms.as_str())]);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("PostgreSQL pool created successfully");
    Ok(pool)
}

/// Creates a SQLite pool, creating the database file if needed
///
/// Foreign keys are enabled on every connection so recommendations are
/// removed together with their claim.
pub async fn create_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    info!(
        "Creating SQLite pool with max_connections={}",
        config.max_connections
    );

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DatabaseError::InvalidConfig(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("SQLite pool created successfully");
    Ok(pool)
}

/// Connects to the configured backend, applies the schema, and returns the store
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn HistoryStore>, DatabaseError> {
    let store: Arc<dyn HistoryStore> = match config.backend {
        DatabaseBackend::Postgres => {
            let store = PostgresHistoryStore::new(create_pg_pool(config).await?);
            store.init_schema().await?;
            Arc::new(store)
        }
        DatabaseBackend::Sqlite => {
            let store = SqliteHistoryStore::new(create_sqlite_pool(config).await?);
            store.init_schema().await?;
            Arc::new(store)
        }
    };

    info!(backend = %config.backend, "History store ready");
    Ok(store)
}
