//! Driver contract
//!
//! This module defines the traits every database driver must implement.
//! Drivers are synchronous: every call blocks until the database answers.
//! The core never talks to a database except through these traits, so any
//! collaborator that can open a connection and vend cursors plugs in here.

use super::config::ConnectConfig;
use super::error::Result;
use super::value::Value;

/// Positional parameter marker flavor used by a driver
///
/// Statements are written with the generic `?` placeholder and rewritten to
/// the driver's native marker before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// `?` — SQLite, MySQL (client-side prepared)
    #[default]
    Question,
    /// `$1`, `$2`, … — PostgreSQL
    Numbered,
    /// `%s` — MySQL DB-API style drivers
    Format,
}

/// Capability to open physical connections
pub trait Driver: Send + Sync {
    /// Open a physical connection using the given configuration
    fn open(&self, config: &ConnectConfig) -> Result<Box<dyn Connection>>;

    /// The positional parameter marker this driver's statements use
    fn param_style(&self) -> ParamStyle {
        ParamStyle::Question
    }
}

/// An open physical connection
///
/// Exclusively owned by one execution context; the core never shares a
/// connection between contexts.
pub trait Connection: Send {
    /// Create a cursor for statement execution
    ///
    /// The cursor borrows the connection, so at most one cursor is live at
    /// a time per connection.
    fn cursor(&mut self) -> Result<Box<dyn Cursor + '_>>;

    /// Commit the current transaction
    fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction
    fn rollback(&mut self) -> Result<()>;

    /// Close the connection, releasing driver resources
    fn close(self: Box<Self>) -> Result<()>;
}

/// A cursor-like handle for executing one statement and fetching its rows
pub trait Cursor {
    /// Execute a statement with positional parameters
    ///
    /// The statement text has already been rewritten to this driver's
    /// native parameter marker.
    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<()>;

    /// Column names of the current result set, in result order
    ///
    /// Valid after `execute` for result-bearing statements; empty for
    /// statements that produce no rows (INSERT, UPDATE, DDL).
    fn column_names(&self) -> &[String];

    /// Fetch the next row, or `None` when the result set is exhausted
    fn fetch_one(&mut self) -> Result<Option<Vec<Value>>>;

    /// Fetch all remaining rows
    fn fetch_all(&mut self) -> Result<Vec<Vec<Value>>>;

    /// Rows affected by the last non-result statement
    fn affected_rows(&self) -> u64;
}
