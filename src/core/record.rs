//! Result row type
//!
//! A [`Record`] is an ordered mapping from column name to [`Value`],
//! produced once per result row. Lookup by name is checked: an absent
//! column is an error, never a silent default.

use super::error::{DbError, Result};
use super::value::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One result row, keyed by column name in result-set order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    /// Build a record by zipping column names with row values
    ///
    /// The two slices are expected to have the same length; extra entries
    /// on either side are dropped, matching cursor descriptions that always
    /// cover every fetched value.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        let mut columns = columns;
        let mut values = values;
        let len = columns.len().min(values.len());
        columns.truncate(len);
        values.truncate(len);
        Self { columns, values }
    }

    /// Look up a value by column name
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ColumnNotFound`] if the record has no such column.
    pub fn get(&self, column: &str) -> Result<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
            .ok_or_else(|| DbError::column_not_found(column))
    }

    /// Look up a value by column name, returning `None` when absent
    pub fn try_get(&self, column: &str) -> Option<&Value> {
        self.get(column).ok()
    }

    /// Get a value by position in result-set order
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Column names in result-set order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Check whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over (column, value) pairs in result-set order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.width()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
