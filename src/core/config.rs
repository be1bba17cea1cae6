//! Connection configuration
//!
//! An explicit configuration value passed to whatever constructs execution
//! contexts. There is no process-wide engine state: build one
//! [`ConnectConfig`], hand it to an engine, done.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connection parameters for a database driver
///
/// Which fields matter depends on the driver: SQLite reads only `database`
/// (as a file path, `:memory:` when unset), server databases use the full
/// set. Free-form options carry driver-specific settings such as charset
/// or collation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectConfig {
    host: String,
    port: u16,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    options: BTreeMap<String, String>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            database: None,
            username: None,
            password: None,
            options: BTreeMap::new(),
        }
    }
}

impl ConnectConfig {
    /// Create a configuration with default host and port
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Set the database port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database name (for SQLite, the file path)
    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the username
    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Add a driver-specific option
    pub fn option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The configured host
    pub fn host_str(&self) -> &str {
        &self.host
    }

    /// The configured port
    pub fn port_num(&self) -> u16 {
        self.port
    }

    /// The configured database name, if any
    pub fn database_name(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// The configured username, if any
    pub fn username_str(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The configured password, if any
    pub fn password_str(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Look up a driver-specific option
    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}
