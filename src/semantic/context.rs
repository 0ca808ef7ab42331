//! Filter contexts: the immutable set of row-selection predicates a measure
//! is evaluated against.
//!
//! The ambient "current filter context" of the source BI tool becomes an
//! explicit value here: every evaluation call threads a `FilterContext`, and
//! `CALCULATE`-style overrides produce a new context instead of mutating
//! shared state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Row, Table, Value};

/// A column-level predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Exact equality against a scalar.
    Equals(Value),
    /// Set membership: the value must equal one of the listed scalars.
    In(Vec<Value>),
    /// Boolean literal for flag columns.
    Bool(bool),
}

impl Predicate {
    /// Does this predicate accept the given cell value?
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Predicate::Equals(expected) => value == expected,
            Predicate::In(set) => set.iter().any(|v| v == value),
            Predicate::Bool(flag) => value.as_bool() == Some(*flag),
        }
    }

    /// Equality against any scalar convertible to a `Value`.
    pub fn equals(value: impl Into<Value>) -> Self {
        Predicate::Equals(value.into())
    }

    /// Membership in a set of scalars.
    pub fn is_in<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In(values.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Equals(v) => write!(f, "= {}", v),
            Predicate::In(vs) => {
                write!(f, "IN {{")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
            Predicate::Bool(b) => write!(f, "= {}", b),
        }
    }
}

/// One registered constraint: a predicate pinned to a (table, column) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub table: String,
    pub column: String,
    pub predicate: Predicate,
}

impl Constraint {
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            predicate,
        }
    }
}

/// An immutable set of constraints representing the current view.
///
/// Constraints are keyed by `table.column`; a `BTreeMap` keeps iteration and
/// serialization order deterministic, which the evaluator's fingerprinting
/// relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterContext {
    constraints: BTreeMap<String, Constraint>,
}

impl FilterContext {
    /// The unconstrained context: every row of every table is in view.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return a new context with `predicate` on `(table, column)`, replacing
    /// any existing predicate on that exact pair. All other constraints are
    /// inherited unchanged.
    pub fn with_predicate(
        &self,
        table: impl Into<String>,
        column: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        let table = table.into();
        let column = column.into();
        let mut next = self.clone();
        next.constraints.insert(
            format!("{}.{}", table, column),
            Constraint {
                table,
                column,
                predicate,
            },
        );
        next
    }

    /// The predicate registered on `(table, column)`, if any.
    pub fn predicate(&self, table: &str, column: &str) -> Option<&Predicate> {
        self.constraints
            .get(&format!("{}.{}", table, column))
            .map(|c| &c.predicate)
    }

    /// True iff every constraint registered for `table` accepts the row.
    pub fn matches(&self, table: &str, row: &Row) -> bool {
        self.constraints
            .values()
            .filter(|c| c.table == table)
            .all(|c| c.predicate.accepts(Table::cell(row, &c.column)))
    }

    /// The lazy, restartable sequence of rows in `table` the context selects.
    pub fn apply<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a Row> + 'a {
        table.rows.iter().filter(|row| self.matches(&table.name, row))
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }
}
