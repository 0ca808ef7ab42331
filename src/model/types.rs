//! Scalar value and data type primitives.

use serde::{Deserialize, Serialize};

/// A scalar cell value.
///
/// Dates are carried as ISO-8601 text (`YYYY-MM-DD`), matching the source
/// extracts. The untagged serde representation lets JSON rows deserialize
/// directly into `Row` maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing / null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value (all numbers are f64).
    Number(f64),
    /// Text, including ISO dates.
    Text(String),
}

impl Value {
    /// Numeric view of this value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean view of this value, if it is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical key used for distinct counting.
    ///
    /// Nulls have no key and are skipped by `DistinctCount`. The type prefix
    /// keeps `Number(1.0)` and `Text("1")` distinct.
    pub fn distinct_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(format!("b:{}", b)),
            Value::Number(n) => Some(format!("n:{}", n)),
            Value::Text(s) => Some(format!("t:{}", s)),
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Free text.
    Text,
    /// Numeric (f64).
    Number,
    /// Boolean flag.
    Boolean,
    /// ISO-8601 date carried as text.
    Date,
}

impl DataType {
    /// Infer the column type from a sample value. Nulls carry no type.
    pub fn of(value: &Value) -> Option<DataType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(DataType::Boolean),
            Value::Number(_) => Some(DataType::Number),
            Value::Text(s) if is_iso_date(s) => Some(DataType::Date),
            Value::Text(_) => Some(DataType::Text),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `YYYY-MM-DD` shape check, enough to tell dates from other text.
fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| if i == 4 || i == 7 { *c == b'-' } else { c.is_ascii_digit() })
}
