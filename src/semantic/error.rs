//! Error types for the semantic layer.
//!
//! Registry errors surface at build time and are fatal; evaluation errors
//! surface to the caller per query. Safe division is deliberately *not* an
//! error: a zero denominator yields the measure's declared default.

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while building a measure registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate measure '{0}'")]
    DuplicateMeasure(String),

    #[error("measure '{measure}' references unknown measure '{referenced}'")]
    UnknownMeasure { measure: String, referenced: String },

    #[error("cyclic measure dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),
}

/// Errors raised while evaluating a measure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown measure '{0}'")]
    UnknownMeasure(String),

    #[error("table '{0}' is not present in the dataset")]
    UnknownTable(String),

    #[error("no declared relationship from '{from}' to '{to}'")]
    NoRelationship { from: String, to: String },

    #[error(
        "RELATED({to}[{column}]) from '{from}' matched {matched} dimension rows; \
         expected exactly one"
    )]
    RelationshipAmbiguity {
        from: String,
        to: String,
        column: String,
        matched: usize,
    },

    #[error("{0} is only valid inside a row-wise aggregation")]
    RowScopeRequired(String),

    #[error("non-numeric value in {table}[{column}]: {found}")]
    NonNumeric {
        table: String,
        column: String,
        found: String,
    },
}
