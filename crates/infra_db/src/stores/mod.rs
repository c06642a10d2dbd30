//! History store implementations
//!
//! - **PostgresHistoryStore**: shared server database, `ILIKE` keyword search
//! - **SqliteHistoryStore**: single-file or in-memory database, `LIKE` search
//!   (ASCII case folding only)

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresHistoryStore;
pub use sqlite::SqliteHistoryStore;
