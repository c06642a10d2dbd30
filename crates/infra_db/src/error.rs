//! Database error types
//!
//! Errors raised by either backend are classified into one enum so the stores
//! can hand a uniform [`PortError`] back to the domain.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Configuration could not be turned into connect options
    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check or not-null constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The server cancelled a statement that exceeded `statement_timeout`
    #[error("Statement timed out: {0}")]
    StatementTimeout(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Stored data could not be decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Claim", "CLM-7");
    /// assert!(error.to_string().contains("CLM-7"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Classifies SQLx errors by PostgreSQL SQLSTATE or SQLite extended result code
///
/// - PostgreSQL: <https://www.postgresql.org/docs/current/errcodes-appendix.html>
/// - SQLite: <https://www.sqlite.org/rescode.html#extrc>
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::SerializationError(error.to_string())
            }
            sqlx::Error::Migrate(e) => DatabaseError::MigrationFailed(e.to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    // unique_violation / SQLITE_CONSTRAINT_UNIQUE, _PRIMARYKEY
                    Some("23505") | Some("2067") | Some("1555") => {
                        DatabaseError::DuplicateEntry(message)
                    }
                    // foreign_key_violation / SQLITE_CONSTRAINT_FOREIGNKEY
                    Some("23503") | Some("787") => DatabaseError::ForeignKeyViolation(message),
                    // check_violation, not_null_violation / SQLITE_CONSTRAINT_CHECK, _NOTNULL
                    Some("23514") | Some("23502") | Some("275") | Some("1299") => {
                        DatabaseError::ConstraintViolation(message)
                    }
                    // query_canceled
                    Some("57014") => DatabaseError::StatementTimeout(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Translates database errors for the domain ports
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => PortError::NotFound {
                entity_type: "Record".to_string(),
                id: message,
            },
            DatabaseError::DuplicateEntry(message) => PortError::Conflict { message },
            DatabaseError::ForeignKeyViolation(message)
            | DatabaseError::ConstraintViolation(message) => PortError::Validation {
                message,
                field: None,
            },
            DatabaseError::StatementTimeout(operation) => PortError::Timeout {
                operation,
                duration_ms: 0,
            },
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => {
                PortError::Connection {
                    message: error.to_string(),
                    source: Some(Box::new(error)),
                }
            }
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error = DatabaseError::from(&sqlx::Error::RowNotFound);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(error.is_connection_error());

        let port: PortError = error.into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_constraint_maps_to_validation() {
        let port: PortError = DatabaseError::ForeignKeyViolation("claim_id".into()).into();
        assert!(matches!(port, PortError::Validation { .. }));
    }
}
