//! Schema registry: table definitions and declared fact→dimension relationships.
//!
//! The registry is built once at load time. Registration errors are fatal to
//! startup; evaluation never mutates the schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::DataType;

/// A declared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A declared table: its columns and, for dimensions, the key column that
/// uniquely identifies a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<Column>,
    /// Key column. Required on the target side of a relationship.
    pub key: Option<String>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            key: None,
        }
    }

    /// Declare the key column.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Cardinality of a declared relationship.
///
/// Only many-to-one links (fact foreign key to dimension key) support
/// single-row `RELATED` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    ManyToOne,
    OneToOne,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "N:1"),
            Cardinality::OneToOne => write!(f, "1:1"),
        }
    }
}

/// A directed foreign-key link from a fact column to a dimension key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    pub cardinality: Cardinality,
}

impl Relationship {
    /// A many-to-one link (the common star-schema case).
    pub fn many_to_one(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
            cardinality: Cardinality::ManyToOne,
        }
    }
}

/// Errors raised during schema registration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate table '{0}'")]
    DuplicateTable(String),

    #[error("relationship references undeclared table '{0}'")]
    UnknownTable(String),

    #[error("relationship references unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("duplicate relationship from '{from}' to '{to}'")]
    DuplicateRelationship { from: String, to: String },

    #[error(
        "relationship {from_table}.{from_column} -> {to_table}.{to_column} is not \
         many-to-one: '{to_column}' is not the key of '{to_table}'"
    )]
    NotManyToOne {
        from_table: String,
        from_column: String,
        to_table: String,
        to_column: String,
    },
}

/// The schema registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    tables: HashMap<String, TableDef>,
    relationships: Vec<Relationship>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table definition.
    pub fn register_table(&mut self, def: TableDef) -> Result<(), SchemaError> {
        if self.tables.contains_key(&def.name) {
            return Err(SchemaError::DuplicateTable(def.name));
        }
        self.tables.insert(def.name.clone(), def);
        Ok(())
    }

    /// Register a fact→dimension relationship.
    ///
    /// Both endpoints must already be registered, the target column must be
    /// the declared key of the target table, and at most one relationship may
    /// exist per (fact, dimension) pair.
    pub fn register_relationship(&mut self, rel: Relationship) -> Result<(), SchemaError> {
        let from = self
            .tables
            .get(&rel.from_table)
            .ok_or_else(|| SchemaError::UnknownTable(rel.from_table.clone()))?;
        let to = self
            .tables
            .get(&rel.to_table)
            .ok_or_else(|| SchemaError::UnknownTable(rel.to_table.clone()))?;

        if !from.has_column(&rel.from_column) {
            return Err(SchemaError::UnknownColumn {
                table: rel.from_table,
                column: rel.from_column,
            });
        }
        if !to.has_column(&rel.to_column) {
            return Err(SchemaError::UnknownColumn {
                table: rel.to_table,
                column: rel.to_column,
            });
        }
        if to.key.as_deref() != Some(rel.to_column.as_str()) {
            return Err(SchemaError::NotManyToOne {
                from_table: rel.from_table,
                from_column: rel.from_column,
                to_table: rel.to_table,
                to_column: rel.to_column,
            });
        }
        if self.relationship(&rel.from_table, &rel.to_table).is_some() {
            return Err(SchemaError::DuplicateRelationship {
                from: rel.from_table,
                to: rel.to_table,
            });
        }

        self.relationships.push(rel);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }

    /// The declared relationship between a fact and a dimension, if any.
    pub fn relationship(&self, from_table: &str, to_table: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.from_table == from_table && r.to_table == to_table)
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }
}
