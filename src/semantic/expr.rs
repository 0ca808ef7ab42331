//! The measure expression tree.
//!
//! Measures are compiled once into trees of these nodes; cross-measure
//! references are explicit `MeasureRef` nodes resolved through the registry,
//! never late-bound string lookup at evaluation time. That keeps the
//! dependency graph visible to cycle detection ahead of execution.

use serde::{Deserialize, Serialize};

use super::context::Constraint;

// =============================================================================
// Core Expression Type
// =============================================================================

/// A measure expression.
///
/// `Column` and `Related` are only valid inside a row-wise aggregation
/// (`SumX`), where the evaluator layers a transient per-row scope on top of
/// the table-level filter context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal.
    Literal(f64),

    /// Value of a column in the current row scope.
    Column { table: String, column: String },

    /// Single-row lookup through the declared relationship from the scoped
    /// row's table to `table`.
    Related { table: String, column: String },

    /// Number of rows of `table` in the current filter context.
    CountRows { table: String },

    /// Sum of a numeric column over the filtered rows.
    Sum { table: String, column: String },

    /// Mean of a numeric column over the filtered rows; null cells are
    /// ignored, and an empty selection averages to zero.
    Average { table: String, column: String },

    /// Number of distinct non-null values of a column.
    DistinctCount { table: String, column: String },

    /// Row-wise sum: evaluate `row` once per filtered row of `table`.
    SumX { table: String, row: Box<Expr> },

    /// Evaluate `inner` under a context with the overrides applied left to
    /// right, each replacing any predicate on its exact (table, column).
    Calculate {
        inner: Box<Expr>,
        overrides: Vec<Constraint>,
    },

    /// Safe division: an exactly-zero denominator yields `default` instead of
    /// an error.
    Divide {
        numerator: Box<Expr>,
        denominator: Box<Expr>,
        default: f64,
    },

    /// Reference to another registered measure, evaluated under the current
    /// filter context.
    MeasureRef(String),

    /// Scalar arithmetic.
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

/// Scalar arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Raw division with IEEE semantics. Measures that can see an empty
    /// selection should use `Divide` instead.
    Div,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl Expr {
    /// Numeric literal.
    pub fn lit(value: f64) -> Self {
        Expr::Literal(value)
    }

    /// Row-scope column reference.
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Row-scope related-table lookup.
    pub fn related(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Related {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn count_rows(table: impl Into<String>) -> Self {
        Expr::CountRows {
            table: table.into(),
        }
    }

    pub fn sum(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Sum {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn average(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Average {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn distinct_count(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::DistinctCount {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn sum_x(table: impl Into<String>, row: Expr) -> Self {
        Expr::SumX {
            table: table.into(),
            row: Box::new(row),
        }
    }

    pub fn calculate(inner: Expr, overrides: Vec<Constraint>) -> Self {
        Expr::Calculate {
            inner: Box::new(inner),
            overrides,
        }
    }

    pub fn divide(numerator: Expr, denominator: Expr, default: f64) -> Self {
        Expr::Divide {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
            default,
        }
    }

    /// Reference to another registered measure.
    pub fn measure(name: impl Into<String>) -> Self {
        Expr::MeasureRef(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    // === Convenience methods for scalar math ===

    /// expr + other
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Add, other)
    }

    /// expr - other
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Sub, other)
    }

    /// expr * other
    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Mul, other)
    }

    /// expr / other (raw IEEE division; see `Divide` for the safe form)
    #[allow(clippy::should_implement_trait)]
    pub fn div(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Div, other)
    }
}

// =============================================================================
// Dependency Collection
// =============================================================================

impl Expr {
    /// Names of all measures this expression references, in first-seen order.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps = Vec::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    fn collect_dependencies(&self, deps: &mut Vec<String>) {
        match self {
            Expr::MeasureRef(name) => {
                if !deps.iter().any(|d| d == name) {
                    deps.push(name.clone());
                }
            }
            Expr::SumX { row, .. } => row.collect_dependencies(deps),
            Expr::Calculate { inner, .. } => inner.collect_dependencies(deps),
            Expr::Divide {
                numerator,
                denominator,
                ..
            } => {
                numerator.collect_dependencies(deps);
                denominator.collect_dependencies(deps);
            }
            Expr::BinaryOp { left, right, .. } => {
                left.collect_dependencies(deps);
                right.collect_dependencies(deps);
            }
            Expr::Literal(_)
            | Expr::Column { .. }
            | Expr::Related { .. }
            | Expr::CountRows { .. }
            | Expr::Sum { .. }
            | Expr::Average { .. }
            | Expr::DistinctCount { .. } => {}
        }
    }
}

// =============================================================================
// Textual Form
// =============================================================================

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Column { table, column } => write!(f, "{}[{}]", table, column),
            Expr::Related { table, column } => write!(f, "RELATED({}[{}])", table, column),
            Expr::CountRows { table } => write!(f, "COUNTROWS({})", table),
            Expr::Sum { table, column } => write!(f, "SUM({}[{}])", table, column),
            Expr::Average { table, column } => write!(f, "AVERAGE({}[{}])", table, column),
            Expr::DistinctCount { table, column } => {
                write!(f, "DISTINCTCOUNT({}[{}])", table, column)
            }
            Expr::SumX { table, row } => write!(f, "SUMX({}, {})", table, row),
            Expr::Calculate { inner, overrides } => {
                write!(f, "CALCULATE({}", inner)?;
                for c in overrides {
                    write!(f, ", {}[{}] {}", c.table, c.column, c.predicate)?;
                }
                write!(f, ")")
            }
            Expr::Divide {
                numerator,
                denominator,
                default,
            } => write!(f, "DIVIDE({}, {}, {})", numerator, denominator, default),
            Expr::MeasureRef(name) => write!(f, "[{}]", name),
            Expr::BinaryOp { left, op, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
        }
    }
}
