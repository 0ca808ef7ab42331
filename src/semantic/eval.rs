//! The evaluator: pure recursive evaluation of measure expressions against an
//! immutable dataset and filter context.
//!
//! `evaluate(measure, context)` is a pure function of its arguments, which
//! makes per-`(measure, context)` memoization a valid optimization rather
//! than a correctness requirement; `with_memo` opts in.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::cache;
use crate::model::{Dataset, Row, Schema, Table, Value};

use super::context::FilterContext;
use super::error::{EvalError, EvalResult};
use super::expr::{BinaryOp, Expr};
use super::registry::MeasureRegistry;

/// Transient per-row scope layered on the outer filter context while a
/// row-wise aggregation iterates. Discarded after each row.
struct RowScope<'r> {
    table: &'r str,
    row: &'r Row,
}

/// Evaluates measures against a dataset under a filter context.
///
/// The evaluator borrows everything it reads; the only shared resource is
/// the read-only table set, so independent evaluations need no locking.
pub struct Evaluator<'a> {
    schema: &'a Schema,
    dataset: &'a Dataset,
    registry: &'a MeasureRegistry,
    memo: Option<RefCell<HashMap<String, f64>>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(schema: &'a Schema, dataset: &'a Dataset, registry: &'a MeasureRegistry) -> Self {
        Self {
            schema,
            dataset,
            registry,
            memo: None,
        }
    }

    /// Enable memoization keyed by the fingerprint of `(measure, context)`.
    pub fn with_memo(mut self) -> Self {
        self.memo = Some(RefCell::new(HashMap::new()));
        self
    }

    /// Evaluate a registered measure under the given filter context.
    pub fn evaluate(&self, measure: &str, ctx: &FilterContext) -> EvalResult<f64> {
        let def = self
            .registry
            .get(measure)
            .ok_or_else(|| EvalError::UnknownMeasure(measure.to_string()))?;

        if let Some(memo) = &self.memo {
            if let Ok(key) = cache::fingerprint(&(measure, ctx)) {
                if let Some(cached) = memo.borrow().get(&key) {
                    return Ok(*cached);
                }
                let value = self.eval(&def.expr, ctx, None)?;
                memo.borrow_mut().insert(key, value);
                return Ok(value);
            }
        }
        self.eval(&def.expr, ctx, None)
    }

    /// Evaluate an ad-hoc expression under the given filter context.
    ///
    /// `MeasureRef` nodes still resolve through the registry.
    pub fn evaluate_expr(&self, expr: &Expr, ctx: &FilterContext) -> EvalResult<f64> {
        self.eval(expr, ctx, None)
    }

    fn eval(&self, expr: &Expr, ctx: &FilterContext, row: Option<&RowScope>) -> EvalResult<f64> {
        match expr {
            Expr::Literal(v) => Ok(*v),

            Expr::Column { table, column } => {
                let scope = row.ok_or_else(|| {
                    EvalError::RowScopeRequired(format!("{}[{}]", table, column))
                })?;
                numeric_cell(Table::cell(scope.row, column), table, column)
            }

            Expr::Related { table, column } => self.eval_related(table, column, ctx, row),

            Expr::CountRows { table } => {
                let tbl = self.table(table)?;
                Ok(ctx.apply(tbl).count() as f64)
            }

            Expr::Sum { table, column } => {
                let tbl = self.table(table)?;
                let mut total = 0.0;
                for r in ctx.apply(tbl) {
                    let cell = Table::cell(r, column);
                    if !cell.is_null() {
                        total += numeric_cell(cell, table, column)?;
                    }
                }
                Ok(total)
            }

            Expr::Average { table, column } => {
                let tbl = self.table(table)?;
                let mut total = 0.0;
                let mut count = 0usize;
                for r in ctx.apply(tbl) {
                    let cell = Table::cell(r, column);
                    if !cell.is_null() {
                        total += numeric_cell(cell, table, column)?;
                        count += 1;
                    }
                }
                if count == 0 {
                    Ok(0.0)
                } else {
                    Ok(total / count as f64)
                }
            }

            Expr::DistinctCount { table, column } => {
                let tbl = self.table(table)?;
                let mut seen = HashSet::new();
                for r in ctx.apply(tbl) {
                    if let Some(key) = Table::cell(r, column).distinct_key() {
                        seen.insert(key);
                    }
                }
                Ok(seen.len() as f64)
            }

            Expr::SumX { table, row: row_expr } => {
                let tbl = self.table(table)?;
                let mut total = 0.0;
                for r in ctx.apply(tbl) {
                    let scope = RowScope { table, row: r };
                    total += self.eval(row_expr, ctx, Some(&scope))?;
                }
                Ok(total)
            }

            Expr::Calculate { inner, overrides } => {
                let mut narrowed = ctx.clone();
                for c in overrides {
                    narrowed = narrowed.with_predicate(&c.table, &c.column, c.predicate.clone());
                }
                self.eval(inner, &narrowed, row)
            }

            Expr::Divide {
                numerator,
                denominator,
                default,
            } => {
                let num = self.eval(numerator, ctx, row)?;
                let den = self.eval(denominator, ctx, row)?;
                if den == 0.0 {
                    Ok(*default)
                } else {
                    Ok(num / den)
                }
            }

            Expr::MeasureRef(name) => match row {
                // Table-level reference: route through `evaluate` so the
                // memo (when enabled) also caches intermediate measures.
                None => self.evaluate(name, ctx),
                Some(_) => {
                    let def = self
                        .registry
                        .get(name)
                        .ok_or_else(|| EvalError::UnknownMeasure(name.clone()))?;
                    self.eval(&def.expr, ctx, row)
                }
            },

            Expr::BinaryOp { left, op, right } => {
                let l = self.eval(left, ctx, row)?;
                let r = self.eval(right, ctx, row)?;
                Ok(match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                })
            }
        }
    }

    /// Resolve a `RELATED` lookup from the scoped row to a dimension column.
    ///
    /// The dimension row must match the relationship key *and* survive the
    /// current filter context; anything other than exactly one match is an
    /// ambiguity error.
    fn eval_related(
        &self,
        to_table: &str,
        column: &str,
        ctx: &FilterContext,
        row: Option<&RowScope>,
    ) -> EvalResult<f64> {
        let scope = row.ok_or_else(|| {
            EvalError::RowScopeRequired(format!("RELATED({}[{}])", to_table, column))
        })?;
        let rel = self
            .schema
            .relationship(scope.table, to_table)
            .ok_or_else(|| EvalError::NoRelationship {
                from: scope.table.to_string(),
                to: to_table.to_string(),
            })?;

        let key = Table::cell(scope.row, &rel.from_column);
        let dim = self.table(to_table)?;
        let mut matches = dim
            .rows
            .iter()
            .filter(|r| !key.is_null() && Table::cell(r, &rel.to_column) == key)
            .filter(|r| ctx.matches(to_table, r));

        let first = matches.next();
        let second = matches.next();
        match (first, second) {
            (Some(dim_row), None) => {
                numeric_cell(Table::cell(dim_row, column), to_table, column)
            }
            (None, _) => Err(EvalError::RelationshipAmbiguity {
                from: scope.table.to_string(),
                to: to_table.to_string(),
                column: column.to_string(),
                matched: 0,
            }),
            (Some(_), Some(_)) => Err(EvalError::RelationshipAmbiguity {
                from: scope.table.to_string(),
                to: to_table.to_string(),
                column: column.to_string(),
                matched: 2 + matches.count(),
            }),
        }
    }

    fn table(&self, name: &str) -> EvalResult<&Table> {
        self.dataset
            .get(name)
            .ok_or_else(|| EvalError::UnknownTable(name.to_string()))
    }
}

/// Numeric view of a cell. Nulls read as the additive identity; any other
/// non-number is an error.
fn numeric_cell(value: &Value, table: &str, column: &str) -> EvalResult<f64> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::NonNumeric {
            table: table.to_string(),
            column: column.to_string(),
            found: other.type_name().to_string(),
        }),
    }
}
