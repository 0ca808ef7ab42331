//! Core data model: scalar values, tables, and the schema registry.

pub mod schema;
pub mod table;
pub mod types;

pub use schema::{Cardinality, Column, Relationship, Schema, SchemaError, TableDef};
pub use table::{row, Dataset, Row, Table};
pub use types::{DataType, Value};
