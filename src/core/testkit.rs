//! Recording mock driver for lifecycle tests
//!
//! Scriptable [`Driver`] implementation that records every physical event
//! (open, execute, commit, rollback, close) per connection and can inject
//! commit/rollback failures. Result sets are scripted up front and consumed
//! one per execute, in order.

use super::config::ConnectConfig;
use super::driver::{Connection, Cursor, Driver};
use super::error::{DbError, Result};
use super::value::Value;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A physical event observed by the mock driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Open,
    Execute,
    Commit,
    Rollback,
    Close,
}

#[derive(Default)]
struct MockState {
    events: Vec<(usize, Event)>,
    executed: Vec<(String, Vec<Value>)>,
    results: VecDeque<Scripted>,
    next_connection: usize,
    fail_commits: bool,
    fail_rollbacks: bool,
}

#[derive(Default)]
struct Scripted {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    affected: u64,
}

/// Shared-state mock driver; clones observe the same log and script
#[derive(Clone, Default)]
pub struct RecordingDriver {
    state: Arc<Mutex<MockState>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a result-bearing statement
    pub fn push_rows(&self, columns: Vec<String>, rows: Vec<Vec<Value>>) {
        self.state.lock().results.push_back(Scripted {
            columns,
            rows,
            affected: 0,
        });
    }

    /// Script a non-result statement reporting an affected-row count
    pub fn push_affected(&self, affected: u64) {
        self.state.lock().results.push_back(Scripted {
            affected,
            ..Scripted::default()
        });
    }

    /// Make every commit fail with an IO error
    pub fn fail_commits(&self) {
        self.state.lock().fail_commits = true;
    }

    /// Make every rollback fail with an IO error
    pub fn fail_rollbacks(&self) {
        self.state.lock().fail_rollbacks = true;
    }

    /// All recorded events in order, tagged with their connection id
    pub fn events(&self) -> Vec<(usize, Event)> {
        self.state.lock().events.clone()
    }

    /// Statements executed so far, with their parameters
    pub fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.state.lock().executed.clone()
    }

    /// Count events of one kind across all connections
    pub fn count(&self, event: Event) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(_, e)| *e == event)
            .count()
    }

    /// Count events of one kind on one connection
    pub fn count_for(&self, connection: usize, event: Event) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(c, e)| *c == connection && *e == event)
            .count()
    }

    /// Ids of every connection opened so far
    pub fn connection_ids(&self) -> Vec<usize> {
        let state = self.state.lock();
        state
            .events
            .iter()
            .filter(|(_, e)| *e == Event::Open)
            .map(|(c, _)| *c)
            .collect()
    }
}

impl Driver for RecordingDriver {
    fn open(&self, _config: &ConnectConfig) -> Result<Box<dyn Connection>> {
        let mut state = self.state.lock();
        let id = state.next_connection;
        state.next_connection += 1;
        state.events.push((id, Event::Open));
        Ok(Box::new(MockConnection {
            id,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    id: usize,
    state: Arc<Mutex<MockState>>,
}

fn injected(kind: &str) -> DbError {
    DbError::Io(std::io::Error::other(format!("injected {kind} failure")))
}

impl Connection for MockConnection {
    fn cursor(&mut self) -> Result<Box<dyn Cursor + '_>> {
        Ok(Box::new(MockCursor {
            connection: self.id,
            state: Arc::clone(&self.state),
            columns: Vec::new(),
            rows: VecDeque::new(),
            affected: 0,
        }))
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.events.push((self.id, Event::Commit));
        if state.fail_commits {
            return Err(injected("commit"));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.events.push((self.id, Event::Rollback));
        if state.fail_rollbacks {
            return Err(injected("rollback"));
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.state.lock().events.push((self.id, Event::Close));
        Ok(())
    }
}

struct MockCursor {
    connection: usize,
    state: Arc<Mutex<MockState>>,
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
    affected: u64,
}

impl Cursor for MockCursor {
    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<()> {
        let mut state = self.state.lock();
        state.events.push((self.connection, Event::Execute));
        state
            .executed
            .push((statement.to_string(), params.to_vec()));
        let scripted = state.results.pop_front().unwrap_or_default();
        self.columns = scripted.columns;
        self.rows = scripted.rows.into();
        self.affected = scripted.affected;
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
