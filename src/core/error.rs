//! Error types for scoped database execution
//!
//! This module defines all error types that can occur while managing
//! connections, transactions, and statement execution.

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Execution context initialized twice, or used before initialization
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scalar query returned a row with other than exactly one column
    #[error("Expected exactly one column, got {count}")]
    MultiColumn { count: usize },

    /// Scalar query returned no rows
    #[error("Query returned no rows")]
    NoRows,

    /// Checked record lookup on an absent column
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Commit raised; rollback was attempted and the original failure kept
    #[error("Commit failed: {source}")]
    CommitFailed {
        #[source]
        source: Box<DbError>,
    },

    /// Rollback raised; propagated directly, no further recovery
    #[error("Rollback failed: {source}")]
    RollbackFailed {
        #[source]
        source: Box<DbError>,
    },

    /// Failure reported by an external driver, passed through unmodified
    #[error("Driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        DbError::Configuration(msg.into())
    }

    /// Create a multi-column error for a row of the given width
    pub fn multi_column(count: usize) -> Self {
        DbError::MultiColumn { count }
    }

    /// Create a column-not-found error
    pub fn column_not_found<S: Into<String>>(column: S) -> Self {
        DbError::ColumnNotFound(column.into())
    }

    /// Wrap a commit failure, keeping the original error as the source
    pub fn commit_failed(source: DbError) -> Self {
        DbError::CommitFailed {
            source: Box::new(source),
        }
    }

    /// Wrap a rollback failure, keeping the original error as the source
    pub fn rollback_failed(source: DbError) -> Self {
        DbError::RollbackFailed {
            source: Box::new(source),
        }
    }

    /// Wrap an arbitrary driver error
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DbError::Driver(Box::new(err))
    }
}
