//! # Gauge
//!
//! An in-memory semantic measure engine for manufacturing operations data.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Dataset (JSON) + Manifest (TOML)                  │
//! │  (tables, dimension keys, fact→dimension relationships)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Schema Registry + Dataset (Rust Types)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [registry builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │      MeasureRegistry (compiled expression trees,         │
//! │             cycle-checked dependency graph)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [evaluator]
//! ┌─────────────────────────────────────────────────────────┐
//! │   evaluate(measure, filter context) → scalar | error     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Evaluation is a pure function over immutable tables and a filter-context
//! snapshot: no process-wide filter state, no suspension points, no locking.
//! The built-in [`catalog`] carries the standard manufacturing star schema
//! and measure set (throughput, OEE, cost, downtime, alarms, shift and
//! priority comparisons).

pub mod cache;
pub mod catalog;
pub mod loader;
pub mod model;
pub mod semantic;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{standard_measures, standard_registry, standard_schema};
    pub use crate::loader::{load_dataset, load_tables, Manifest};
    pub use crate::model::{
        row, Column, DataType, Dataset, Relationship, Row, Schema, SchemaError, Table,
        TableDef, Value,
    };
    pub use crate::semantic::{
        Constraint, EvalError, EvalResult, Evaluator, Expr, FilterContext, Measure,
        MeasureRegistry, Predicate, RegistryError,
    };
}

// Also export the workhorse types at the crate root for convenience.
pub use model::{Dataset, Schema, Table, Value};
pub use semantic::{Evaluator, Expr, FilterContext, Measure, MeasureRegistry, Predicate};
