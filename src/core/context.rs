//! Execution context and lazy connection wrapper
//!
//! An [`ExecutionContext`] is the state holder bound to one logical unit of
//! execution. It tracks the (lazily opened) connection and the transaction
//! nesting depth. Contexts are never shared between execution units; each
//! unit gets its own via [`Engine::session`](super::session::Engine::session).

use super::config::ConnectConfig;
use super::driver::{Cursor, Driver};
use super::error::{DbError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Connection wrapper that opens the physical connection on first use
///
/// Construction is free; the driver is only asked to open a connection when
/// the first cursor is requested. Commit and rollback on a wrapper that
/// never opened anything are no-ops.
pub struct LazyConnection {
    driver: Arc<dyn Driver>,
    config: Arc<ConnectConfig>,
    connection: Option<Box<dyn super::driver::Connection>>,
}

impl LazyConnection {
    fn new(driver: Arc<dyn Driver>, config: Arc<ConnectConfig>) -> Self {
        Self {
            driver,
            config,
            connection: None,
        }
    }

    /// Whether the physical connection has been opened
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&mut self) -> Result<&mut Box<dyn super::driver::Connection>> {
        if self.connection.is_none() {
            let conn = self.driver.open(&self.config)?;
            debug!("opened physical connection");
            self.connection = Some(conn);
        }
        self.connection
            .as_mut()
            .ok_or_else(|| DbError::configuration("physical connection unavailable"))
    }

    /// Create a cursor, opening the physical connection if necessary
    pub fn cursor(&mut self) -> Result<Box<dyn Cursor + '_>> {
        self.connection()?.cursor()
    }

    /// Commit on the physical connection; no-op if never opened
    pub fn commit(&mut self) -> Result<()> {
        match self.connection {
            Some(ref mut conn) => conn.commit(),
            None => Ok(()),
        }
    }

    /// Roll back on the physical connection; no-op if never opened
    pub fn rollback(&mut self) -> Result<()> {
        match self.connection {
            Some(ref mut conn) => conn.rollback(),
            None => Ok(()),
        }
    }

    /// Close the physical connection and forget it
    ///
    /// Close failures are logged, not propagated: cleanup runs on every
    /// exit path and must not mask the error that got us here.
    pub fn cleanup(&mut self) {
        if let Some(conn) = self.connection.take() {
            debug!("closing physical connection");
            if let Err(err) = conn.close() {
                warn!(error = %err, "failed to close physical connection");
            }
        }
    }
}

/// Per-execution-unit state: optional lazy connection + transaction depth
///
/// Invariant: `transaction_depth > 0` implies the context is initialized.
pub struct ExecutionContext {
    connection: Option<LazyConnection>,
    transaction_depth: u32,
}

impl ExecutionContext {
    /// Create an uninitialized context
    pub fn new() -> Self {
        Self {
            connection: None,
            transaction_depth: 0,
        }
    }

    /// Whether a connection wrapper is bound to this context
    pub fn is_initialized(&self) -> bool {
        self.connection.is_some()
    }

    /// Bind a lazy connection wrapper and reset the transaction depth
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Configuration`] if the context is already
    /// initialized; scope guards check `is_initialized` first, so this only
    /// fires on manual misuse.
    pub fn initialize(&mut self, driver: Arc<dyn Driver>, config: Arc<ConnectConfig>) -> Result<()> {
        if self.is_initialized() {
            return Err(DbError::configuration(
                "execution context is already initialized",
            ));
        }
        debug!("binding lazy connection to execution context");
        self.connection = Some(LazyConnection::new(driver, config));
        self.transaction_depth = 0;
        Ok(())
    }

    /// Create a cursor via the connection wrapper
    ///
    /// Opens the physical connection on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Configuration`] if the context is not initialized.
    pub fn cursor(&mut self) -> Result<Box<dyn Cursor + '_>> {
        self.wrapper_mut()?.cursor()
    }

    /// Current transaction nesting depth
    pub fn transaction_depth(&self) -> u32 {
        self.transaction_depth
    }

    /// Whether a transaction scope is active
    pub fn in_transaction(&self) -> bool {
        self.transaction_depth > 0
    }

    /// Release the connection wrapper, closing any open physical connection
    pub fn teardown(&mut self) {
        if let Some(mut wrapper) = self.connection.take() {
            wrapper.cleanup();
        }
        self.transaction_depth = 0;
    }

    pub(crate) fn wrapper_mut(&mut self) -> Result<&mut LazyConnection> {
        self.connection
            .as_mut()
            .ok_or_else(|| DbError::configuration("execution context is not initialized"))
    }

    pub(crate) fn push_transaction(&mut self) -> u32 {
        self.transaction_depth += 1;
        self.transaction_depth
    }

    pub(crate) fn pop_transaction(&mut self) -> u32 {
        debug_assert!(self.transaction_depth > 0, "transaction scope underflow");
        self.transaction_depth = self.transaction_depth.saturating_sub(1);
        self.transaction_depth
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
