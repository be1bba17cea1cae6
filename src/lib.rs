//! # dbscope
//!
//! Scoped database connection and transaction management: a session opens a
//! physical connection lazily, keeps it for exactly the duration of the
//! outermost scope, and coordinates nested transaction scopes so that one
//! physical commit or rollback covers all of them.
//!
//! ## Features
//!
//! - **Implicit lifecycle**: every operation acquires and releases a
//!   connection by itself; scopes widen that to a block of work
//! - **Nested transactions**: inner scopes join the outer transaction; only
//!   the outermost scope commits or rolls back, and a failure at any depth
//!   rolls back the whole composite transaction
//! - **Driver-agnostic**: any collaborator implementing the
//!   [`Driver`]/[`Connection`]/[`Cursor`] traits plugs in; statements use a
//!   generic `?` placeholder rewritten to the driver's native marker
//! - **Checked records**: result rows are ordered column/value mappings
//!   where a missing column is an error, never a default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbscope::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let engine = Engine::new(SqliteDriver::new(), ConnectConfig::new().database("app.db"));
//!     let session = engine.session();
//!
//!     session.update("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
//!     session.insert("users", &[("id", Value::Int(1)), ("name", Value::from("alice"))])?;
//!
//!     for row in session.select("SELECT * FROM users", &[])? {
//!         println!("{}", row.get("name")?.as_string());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Working with scopes
//!
//! Several statements can share one connection, or one transaction:
//!
//! ```rust,no_run
//! use dbscope::prelude::*;
//!
//! fn transfer(session: &Session) -> Result<()> {
//!     session.with_transaction(|s| {
//!         s.update("UPDATE accounts SET balance = balance - 100 WHERE id = ?", &[Value::Int(1)])?;
//!         s.update("UPDATE accounts SET balance = balance + 100 WHERE id = ?", &[Value::Int(2)])?;
//!         Ok(())
//!     })
//! }
//! ```
//!
//! If the block returns `Err`, the entire transaction rolls back — including
//! statements from enclosing or nested `with_transaction` blocks, which all
//! join the same physical transaction.
//!
//! ## Concurrency model
//!
//! All driver calls are synchronous and blocking. An [`Engine`] is shared
//! freely; a [`Session`] belongs to exactly one logical execution unit
//! (it is `Send` but not `Sync`). Each unit's connection is exclusively
//! owned by its session and never shared.

/// Core lifecycle types and traits
pub mod core;

/// Database driver implementations
pub mod backends;

/// Prelude for convenient imports
///
/// ```rust
/// use dbscope::prelude::*;
///
/// let config = ConnectConfig::new().database(":memory:");
/// ```
pub mod prelude {
    pub use crate::core::{
        ConnectConfig, Connection, ConnectionScope, Cursor, DbError, Driver, Engine,
        ExecutionContext, ParamStyle, Record, Result, Session, TransactionScope, Value,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::backends::SqliteDriver;
}

// Re-export at root level for convenience
pub use crate::core::{
    ConnectConfig, Connection, ConnectionScope, Cursor, DbError, Driver, Engine, ExecutionContext,
    ParamStyle, Record, Result, Session, TransactionScope, Value,
};

#[cfg(feature = "sqlite")]
pub use crate::backends::SqliteDriver;
