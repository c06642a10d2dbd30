//! Infrastructure Database Layer
//!
//! This crate persists processed claims for the claims domain. Two
//! implementations of [`domain_claims::HistoryStore`] are provided, one per
//! supported database, and the backend is chosen once at startup from
//! [`DatabaseConfig`].
//!
//! # Architecture
//!
//! Each store owns its own SQL. Row types and their conversion into domain
//! records are shared in [`rows`]; orderings and derived analytics are left
//! to the domain crate so both backends report identically.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{connect_store, DatabaseBackend, DatabaseConfig};
//!
//! let config = DatabaseConfig::new(DatabaseBackend::Sqlite, "sqlite://claims_history.db");
//! let store = connect_store(&config).await?;
//! let recent = store.list(20).await?;
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod rows;
pub mod stores;

pub use pool::{connect_store, create_pg_pool, create_sqlite_pool, DatabaseBackend, DatabaseConfig};
pub use error::DatabaseError;
pub use stores::{PostgresHistoryStore, SqliteHistoryStore};
