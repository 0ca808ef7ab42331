//! The semantic layer: filter contexts, measure expressions, the registry,
//! and the evaluator.

pub mod context;
pub mod error;
pub mod eval;
pub mod expr;
pub mod measure;
pub mod registry;

pub use context::{Constraint, FilterContext, Predicate};
pub use error::{EvalError, EvalResult, RegistryError};
pub use eval::Evaluator;
pub use expr::{BinaryOp, Expr};
pub use measure::Measure;
pub use registry::MeasureRegistry;
