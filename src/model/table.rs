//! In-memory tables and datasets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Value;

/// A single row: column name to cell value. A missing key reads as null.
pub type Row = HashMap<String, Value>;

/// A named, ordered sequence of rows.
///
/// Tables are loaded once per session and never mutated during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a table with rows.
    pub fn with_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value of `column` in `row`, treating absent columns as null.
    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Value {
        row.get(column).unwrap_or(&Value::Null)
    }
}

/// The loaded table set, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    tables: HashMap<String, Table>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, replacing any previous table of the same name.
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Row-literal convenience for building small tables in tests and fixtures.
///
/// ```
/// use gauge::model::row;
/// let r = row(&[("shift", "Day".into()), ("cycle_time_min", 42.0.into())]);
/// assert_eq!(r.len(), 2);
/// ```
pub fn row(cells: &[(&str, Value)]) -> Row {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
