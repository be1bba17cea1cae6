//! Database driver implementations
//!
//! Concrete implementations of the driver contract in
//! [`core::driver`](crate::core::driver).

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDriver;
