//! Measure definitions.

use serde::{Deserialize, Serialize};

use super::expr::Expr;

/// A named, recomputed-on-demand aggregation formula.
///
/// Measures carry no stored value; the evaluator recomputes them for every
/// filter context. Definitions are immutable after registry build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,
    pub expr: Expr,
    /// One-line description shown by the CLI listing.
    pub description: Option<String>,
}

impl Measure {
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            expr,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
