//! Connection and transaction scope guards
//!
//! Stack-discipline guards governing entry and exit of a bounded block of
//! work. A guard records whether *it* was responsible for opening the
//! connection, so only the outermost guard releases it. Transaction guards
//! additionally count nesting depth: one physical transaction spans all
//! nested scopes, and only the outermost exit commits or rolls back.
//!
//! Most callers reach these through [`Session::with_connection`] and
//! [`Session::with_transaction`](super::session::Session::with_transaction),
//! which guarantee exit on every non-panicking path.
//!
//! [`Session::with_connection`]: super::session::Session::with_connection

use super::context::ExecutionContext;
use super::error::{DbError, Result};
use super::session::Engine;
use tracing::{debug, warn};

/// Guard ensuring a connection exists for the duration of a block
///
/// Entering an already-initialized context is a no-op with respect to the
/// physical connection; only the guard that initialized the context tears
/// it down on exit.
#[must_use = "a connection scope must be exited"]
pub struct ConnectionScope {
    owns_connection: bool,
}

impl ConnectionScope {
    /// Enter the scope, initializing the context if needed
    pub fn enter(ctx: &mut ExecutionContext, engine: &Engine) -> Result<Self> {
        let owns_connection = !ctx.is_initialized();
        if owns_connection {
            ctx.initialize(engine.driver_handle(), engine.config_handle())?;
        }
        Ok(Self { owns_connection })
    }

    /// Whether this guard initialized the context
    pub fn owns_connection(&self) -> bool {
        self.owns_connection
    }

    /// Exit the scope, tearing the context down if this guard owns it
    pub fn exit(self, ctx: &mut ExecutionContext) {
        if self.owns_connection {
            ctx.teardown();
        }
    }
}

/// Guard coordinating nested transaction entry and exit
///
/// Depth 0→1 begins the transaction; deeper entries join it. Exit at any
/// depth above zero only adjusts the counter. The outermost exit performs
/// exactly one physical commit or rollback and then releases the
/// connection if this guard opened it, on every exit path.
#[must_use = "a transaction scope must be exited"]
pub struct TransactionScope {
    owns_connection: bool,
}

impl TransactionScope {
    /// Enter the scope, initializing the context if needed
    pub fn enter(ctx: &mut ExecutionContext, engine: &Engine) -> Result<Self> {
        let owns_connection = !ctx.is_initialized();
        if owns_connection {
            ctx.initialize(engine.driver_handle(), engine.config_handle())?;
        }
        let depth = ctx.push_transaction();
        if depth == 1 {
            debug!("begin transaction");
        } else {
            debug!(depth, "join active transaction");
        }
        Ok(Self { owns_connection })
    }

    /// Whether this guard initialized the context
    pub fn owns_connection(&self) -> bool {
        self.owns_connection
    }

    /// Exit the scope with the block's outcome
    ///
    /// At the outermost exit, `succeeded == true` commits and `false` rolls
    /// back. A failed commit triggers a best-effort rollback, after which
    /// the original commit failure is surfaced as [`DbError::CommitFailed`].
    /// A failed rollback surfaces as [`DbError::RollbackFailed`]. Teardown
    /// runs afterwards regardless, when this guard owns the connection.
    pub fn exit(self, ctx: &mut ExecutionContext, succeeded: bool) -> Result<()> {
        let depth = ctx.pop_transaction();
        let outcome = if depth == 0 {
            if succeeded {
                Self::commit(ctx)
            } else {
                Self::rollback(ctx)
            }
        } else {
            Ok(())
        };
        if self.owns_connection {
            ctx.teardown();
        }
        outcome
    }

    fn commit(ctx: &mut ExecutionContext) -> Result<()> {
        let wrapper = ctx.wrapper_mut()?;
        debug!("commit transaction");
        match wrapper.commit() {
            Ok(()) => {
                debug!("commit ok");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "commit failed, attempting rollback");
                if let Err(rb_err) = wrapper.rollback() {
                    warn!(error = %rb_err, "rollback after failed commit also failed");
                }
                Err(DbError::commit_failed(err))
            }
        }
    }

    fn rollback(ctx: &mut ExecutionContext) -> Result<()> {
        let wrapper = ctx.wrapper_mut()?;
        warn!("rollback transaction");
        match wrapper.rollback() {
            Ok(()) => {
                debug!("rollback ok");
                Ok(())
            }
            Err(err) => Err(DbError::rollback_failed(err)),
        }
    }
}
