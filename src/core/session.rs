//! Engine and session
//!
//! The [`Engine`] pairs a driver with its connection configuration; it is
//! cheap to clone and safe to share. A [`Session`] is vended per logical
//! execution unit and owns that unit's [`ExecutionContext`]; it exposes the
//! scoped-acquisition helpers and the query operations.

use super::config::ConnectConfig;
use super::context::ExecutionContext;
use super::driver::{Driver, ParamStyle};
use super::error::{DbError, Result};
use super::record::Record;
use super::scope::{ConnectionScope, TransactionScope};
use super::statement::{build_insert, rewrite_placeholders};
use super::value::Value;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Statements slower than this are logged at warn level
const SLOW_STATEMENT: Duration = Duration::from_millis(100);

/// Driver plus configuration; the factory for sessions
///
/// Connections are not opened here: an engine only carries what a session
/// needs to open one lazily later.
#[derive(Clone)]
pub struct Engine {
    driver: Arc<dyn Driver>,
    config: Arc<ConnectConfig>,
    param_style: ParamStyle,
}

impl Engine {
    /// Create an engine from a driver and its connection configuration
    pub fn new<D: Driver + 'static>(driver: D, config: ConnectConfig) -> Self {
        let param_style = driver.param_style();
        Self {
            driver: Arc::new(driver),
            config: Arc::new(config),
            param_style,
        }
    }

    /// Vend a session for one logical execution unit
    ///
    /// Every thread (or other unit of execution) must use its own session;
    /// sessions are `Send` but deliberately not `Sync`.
    pub fn session(&self) -> Session {
        Session {
            engine: self.clone(),
            ctx: RefCell::new(ExecutionContext::new()),
        }
    }

    pub(crate) fn driver_handle(&self) -> Arc<dyn Driver> {
        Arc::clone(&self.driver)
    }

    pub(crate) fn config_handle(&self) -> Arc<ConnectConfig> {
        Arc::clone(&self.config)
    }
}

/// Per-execution-unit handle: scoped helpers plus the query operations
///
/// Every operation acquires a connection through a [`ConnectionScope`], so
/// a bare `session.select(..)` opens and releases a connection around the
/// single statement, while calls inside [`Session::with_connection`] or
/// [`Session::with_transaction`] reuse the scope's connection.
pub struct Session {
    engine: Engine,
    ctx: RefCell<ExecutionContext>,
}

impl Session {
    /// The engine this session was vended from
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Current transaction nesting depth
    pub fn transaction_depth(&self) -> u32 {
        self.ctx.borrow().transaction_depth()
    }

    /// Whether a transaction scope is active
    pub fn in_transaction(&self) -> bool {
        self.ctx.borrow().in_transaction()
    }

    /// Run a block with a connection held open across it
    ///
    /// Nested calls share the outermost scope's connection; the connection
    /// is released when the outermost block exits, on success and on error.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Session) -> Result<T>,
    {
        let scope = ConnectionScope::enter(&mut self.ctx.borrow_mut(), &self.engine)?;
        let result = f(self);
        scope.exit(&mut self.ctx.borrow_mut());
        result
    }

    /// Run a block inside a transaction scope
    ///
    /// The block's `Result` decides the outcome at the outermost exit:
    /// `Ok` commits, `Err` rolls back the entire composite transaction.
    /// Nested calls join the outer transaction; see
    /// [`TransactionScope::exit`] for the commit-failure contract.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Session) -> Result<T>,
    {
        let scope = TransactionScope::enter(&mut self.ctx.borrow_mut(), &self.engine)?;
        let result = f(self);
        let exit = scope.exit(&mut self.ctx.borrow_mut(), result.is_ok());
        match (result, exit) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(cause), Err(err)) => {
                warn!(cause = %cause, "rollback failed while unwinding");
                Err(err)
            }
        }
    }

    /// Execute a result-bearing statement and map every row to a [`Record`]
    ///
    /// Zero rows yield an empty vec, not an error.
    pub fn select(&self, statement: &str, params: &[Value]) -> Result<Vec<Record>> {
        self.with_connection(|s| s.fetch_records(statement, params, false))
    }

    /// Like [`Session::select`], returning the first row or `None`
    pub fn select_one(&self, statement: &str, params: &[Value]) -> Result<Option<Record>> {
        self.with_connection(|s| {
            Ok(s.fetch_records(statement, params, true)?.into_iter().next())
        })
    }

    /// Execute a statement expected to produce a single one-column row
    ///
    /// # Errors
    ///
    /// [`DbError::NoRows`] on an empty result, [`DbError::MultiColumn`]
    /// when the row has other than exactly one column.
    pub fn select_scalar(&self, statement: &str, params: &[Value]) -> Result<Value> {
        let record = self.select_one(statement, params)?.ok_or(DbError::NoRows)?;
        if record.width() != 1 {
            return Err(DbError::multi_column(record.width()));
        }
        record.value_at(0).cloned().ok_or(DbError::NoRows)
    }

    /// Execute a non-result statement and return the affected row count
    ///
    /// Outside a transaction scope the statement is committed immediately;
    /// inside one, the commit is deferred to the outermost scope exit.
    pub fn update(&self, statement: &str, params: &[Value]) -> Result<u64> {
        self.with_connection(|s| s.execute_update(statement, params))
    }

    /// Build and execute an INSERT from ordered column/value pairs
    pub fn insert(&self, table: &str, fields: &[(&str, Value)]) -> Result<u64> {
        let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
        let params: Vec<Value> = fields.iter().map(|(_, value)| value.clone()).collect();
        self.update(&build_insert(table, &columns), &params)
    }

    fn fetch_records(
        &self,
        statement: &str,
        params: &[Value],
        first_only: bool,
    ) -> Result<Vec<Record>> {
        let sql = rewrite_placeholders(statement, self.engine.param_style);
        debug!(sql = %sql, params = params.len(), "executing statement");
        let started = Instant::now();

        let mut ctx = self.ctx.borrow_mut();
        let records = {
            let mut cursor = ctx.cursor()?;
            cursor.execute(&sql, params)?;
            let columns = cursor.column_names().to_vec();
            if first_only {
                match cursor.fetch_one()? {
                    Some(values) => vec![Record::new(columns, values)],
                    None => Vec::new(),
                }
            } else {
                cursor
                    .fetch_all()?
                    .into_iter()
                    .map(|values| Record::new(columns.clone(), values))
                    .collect()
            }
        };

        profile(&sql, started);
        Ok(records)
    }

    fn execute_update(&self, statement: &str, params: &[Value]) -> Result<u64> {
        let sql = rewrite_placeholders(statement, self.engine.param_style);
        debug!(sql = %sql, params = params.len(), "executing statement");
        let started = Instant::now();

        let mut ctx = self.ctx.borrow_mut();
        let affected = {
            let mut cursor = ctx.cursor()?;
            cursor.execute(&sql, params)?;
            cursor.affected_rows()
        };

        if !ctx.in_transaction() {
            debug!("auto-commit");
            ctx.wrapper_mut()?.commit()?;
        }

        profile(&sql, started);
        Ok(affected)
    }
}

fn profile(sql: &str, started: Instant) {
    let elapsed = started.elapsed();
    if elapsed > SLOW_STATEMENT {
        warn!(sql = %sql, elapsed_ms = elapsed.as_millis() as u64, "slow statement");
    } else {
        debug!(sql = %sql, elapsed_ms = elapsed.as_millis() as u64, "statement done");
    }
}
