//! SQLite driver backend
//!
//! Reference [`Driver`] implementation over rusqlite. Connections behave
//! like manual-commit DB-API connections: the cursor opens a deferred
//! transaction before the first statement, and nothing is durable until
//! `commit`. Cursors are buffered — `execute` runs the statement to
//! completion and fetches read from the buffer.

use crate::core::config::ConnectConfig;
use crate::core::driver::{Connection, Cursor, Driver, ParamStyle};
use crate::core::error::Result;
use crate::core::value::Value;
use rusqlite::params_from_iter;
use std::collections::VecDeque;
use tracing::debug;

/// SQLite driver
///
/// Uses the config's `database` as the file path, `:memory:` when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    /// Create a new SQLite driver
    pub fn new() -> Self {
        Self
    }
}

impl Driver for SqliteDriver {
    fn open(&self, config: &ConnectConfig) -> Result<Box<dyn Connection>> {
        let path = config.database_name().unwrap_or(":memory:");
        let conn = rusqlite::Connection::open(path)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        debug!(path, "opened sqlite connection");
        Ok(Box::new(SqliteConnection { conn }))
    }

    fn param_style(&self) -> ParamStyle {
        ParamStyle::Question
    }
}

struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl Connection for SqliteConnection {
    fn cursor(&mut self) -> Result<Box<dyn Cursor + '_>> {
        Ok(Box::new(SqliteCursor {
            conn: &self.conn,
            columns: Vec::new(),
            rows: VecDeque::new(),
            affected: 0,
        }))
    }

    fn commit(&mut self) -> Result<()> {
        // autocommit mode means no statement ran since the last commit
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().map_err(|(_, err)| err.into())
    }
}

struct SqliteCursor<'conn> {
    conn: &'conn rusqlite::Connection,
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
    affected: u64,
}

impl Cursor for SqliteCursor<'_> {
    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<()> {
        // manual-commit discipline: open the transaction lazily
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN DEFERRED")?;
        }

        let sql_params: Vec<Box<dyn rusqlite::ToSql>> = params.iter().map(value_to_param).collect();
        let mut stmt = self.conn.prepare(statement)?;

        if stmt.column_count() > 0 {
            self.columns = stmt.column_names().iter().map(|s| s.to_string()).collect();
            self.affected = 0;
            self.rows.clear();
            let mut rows = stmt.query(params_from_iter(sql_params.iter()))?;
            while let Some(row) = rows.next()? {
                self.rows.push_back(row_values(row, self.columns.len())?);
            }
        } else {
            self.columns.clear();
            self.rows.clear();
            self.affected = stmt.execute(params_from_iter(sql_params.iter()))? as u64;
        }

        Ok(())
    }

    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn fetch_one(&mut self) -> Result<Option<Vec<Value>>> {
        Ok(self.rows.pop_front())
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<Value>>> {
        Ok(self.rows.drain(..).collect())
    }

    fn affected_rows(&self) -> u64 {
        self.affected
    }
}

fn row_values(row: &rusqlite::Row<'_>, width: usize) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(width);
    for i in 0..width {
        let value = match row.get_ref(i)? {
            rusqlite::types::ValueRef::Null => Value::Null,
            rusqlite::types::ValueRef::Integer(v) => Value::Int(v),
            rusqlite::types::ValueRef::Real(v) => Value::Float(v),
            rusqlite::types::ValueRef::Text(v) => {
                Value::Text(String::from_utf8_lossy(v).to_string())
            }
            rusqlite::types::ValueRef::Blob(v) => Value::Bytes(v.to_vec()),
        };
        values.push(value);
    }
    Ok(values)
}

fn value_to_param(value: &Value) -> Box<dyn rusqlite::ToSql> {
    match value {
        Value::Null => Box::new(None::<i64>),
        Value::Bool(v) => Box::new(*v),
        Value::Int(v) => Box::new(*v),
        Value::Float(v) => Box::new(*v),
        Value::Text(v) => Box::new(v.clone()),
        Value::Bytes(v) => Box::new(v.clone()),
        Value::Timestamp(v) => Box::new(*v),
    }
}
