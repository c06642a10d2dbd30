//! Database Test Utilities
//!
//! History stores for integration tests: a private in-memory SQLite database
//! per call, and a PostgreSQL container per [`TestDatabase`].

use std::sync::Arc;
use std::time::Duration;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

use domain_claims::HistoryStore;
use infra_db::{create_pg_pool, DatabaseBackend, DatabaseConfig, PostgresHistoryStore, SqliteHistoryStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Credentials the PostgreSQL module image starts with
const POSTGRES_CREDENTIALS: &str = "postgres:postgres";
const POSTGRES_DB: &str = "postgres";

/// Builds the URL for a PostgreSQL container listening on `port`
pub fn postgres_url(host: &str, port: u16) -> String {
    format!("postgres://{POSTGRES_CREDENTIALS}@{host}:{port}/{POSTGRES_DB}")
}

/// Opens an empty in-memory SQLite history store
///
/// # Panics
///
/// Panics if the store cannot be created
pub async fn sqlite_store() -> Arc<dyn HistoryStore> {
    Arc::new(
        SqliteHistoryStore::in_memory()
            .await
            .expect("Failed to create in-memory SQLite store"),
    )
}

/// A PostgreSQL container with the claim history schema applied
///
/// The container is stopped when this value is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    url: String,
    store: Arc<PostgresHistoryStore>,
}

impl TestDatabase {
    /// Starts a container, connects and applies the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or the schema fails to apply
    pub async fn new() -> Result<Self, BoxError> {
        let container = Postgres::default().start().await?;
        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;
        let url = postgres_url(&host, port);

        let pool = create_pg_pool(
            &DatabaseConfig::new(DatabaseBackend::Postgres, url.clone())
                .max_connections(5)
                .connect_timeout(Duration::from_secs(30))
                .statement_timeout(Duration::from_secs(5)),
        )
        .await?;

        let store = PostgresHistoryStore::new(pool);
        store.init_schema().await?;

        Ok(Self {
            _container: container,
            url,
            store: Arc::new(store),
        })
    }

    /// Starts a database, panicking on failure
    pub async fn start() -> Self {
        Self::new().await.expect("Failed to start PostgreSQL test database")
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The store as the concrete PostgreSQL type
    pub fn postgres(&self) -> &PostgresHistoryStore {
        &self.store
    }

    /// The store behind the port trait
    pub fn store(&self) -> Arc<dyn HistoryStore> {
        self.store.clone()
    }

    /// Removes every claim while keeping the schema
    pub async fn clear_data(&self) -> Result<(), BoxError> {
        self.store.clear_all().await?;
        Ok(())
    }
}
