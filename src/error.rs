//! Error types for the data layer.
//!
//! All failures surface as `DbError` variants using `thiserror`. The layer
//! never swallows errors: route handlers decide whether a failure becomes a
//! 500, a graceful degradation, or an empty payload.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Required configuration is missing or invalid. Raised before any
    /// network activity.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Connection establishment failed after exhausting the retry budget.
    #[error("Connection failed after {attempts} attempt(s): {message}")]
    Connection { message: String, attempts: u32 },

    /// A statement failed during execution. Not retried at this layer;
    /// retries exist only at initial connection time.
    #[error("Query failed: {message}")]
    Execution {
        message: String,
        /// e.g. "42P01" for an undefined table
        sql_state: Option<String>,
    },

    /// A statement's placeholder count does not match its parameter count.
    #[error("Statement has {placeholders} placeholder(s) but {supplied} parameter(s) were supplied")]
    PlaceholderMismatch { placeholders: usize, supplied: usize },

    /// A caller-supplied argument is unusable before any statement is built.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl DbError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a connection error carrying the attempt count that was spent.
    pub fn connection(message: impl Into<String>, attempts: u32) -> Self {
        Self::Connection {
            message: message.into(),
            attempts,
        }
    }

    /// Create an execution error with an optional SQLSTATE code.
    pub fn execution(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Execution {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Get the SQLSTATE code for this error, if the driver reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Execution { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::configuration(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::execution(db_err.message(), code)
            }
            sqlx::Error::PoolClosed => {
                DbError::execution("connection pool is closed", None)
            }
            sqlx::Error::Io(io_err) => {
                DbError::execution(format!("I/O error: {}", io_err), None)
            }
            sqlx::Error::ColumnNotFound(col) => {
                DbError::execution(format!("column not found: {}", col), None)
            }
            other => DbError::execution(other.to_string(), None),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::configuration("DB_USER and DB_PASSWORD are required");
        assert!(err.to_string().contains("Configuration error"));

        let err = DbError::connection("refused", 3);
        assert!(err.to_string().contains("after 3 attempt(s)"));
    }

    #[test]
    fn test_sql_state_carried() {
        let err = DbError::execution("relation does not exist", Some("42P01".to_string()));
        assert_eq!(err.sql_state(), Some("42P01"));
    }

    #[test]
    fn test_sql_state_absent_for_other_variants() {
        assert_eq!(DbError::configuration("missing").sql_state(), None);
        assert_eq!(DbError::connection("refused", 1).sql_state(), None);
    }

    #[test]
    fn test_mismatch_display_names_both_counts() {
        let err = DbError::PlaceholderMismatch {
            placeholders: 2,
            supplied: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 placeholder(s)"));
        assert!(msg.contains("1 parameter(s)"));
    }
}
