//! Core lifecycle management types
//!
//! This module provides the building blocks for scoped database execution:
//! the driver contract, the execution context with its lazily-opened
//! connection, the connection/transaction scope guards, and the session
//! API layered on top of them.

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod ident;
pub mod record;
pub mod scope;
pub mod session;
pub mod statement;
pub mod value;

#[cfg(test)]
pub(crate) mod testkit;

// Re-export commonly used types
pub use config::ConnectConfig;
pub use context::{ExecutionContext, LazyConnection};
pub use driver::{Connection, Cursor, Driver, ParamStyle};
pub use error::{DbError, Result};
pub use ident::{next_id, next_id_at};
pub use record::Record;
pub use scope::{ConnectionScope, TransactionScope};
pub use session::{Engine, Session};
pub use statement::{build_insert, rewrite_placeholders};
pub use value::Value;
