//! Dataset loading: a TOML manifest declaring keys and relationships, plus a
//! JSON document carrying the table rows.
//!
//! All schema problems surface here, before any evaluation runs. A manifest
//! looks like:
//!
//! ```toml
//! [tables.fact_production]
//!
//! [tables.dim_stations]
//! key = "station_id"
//!
//! [[relationships]]
//! from_table = "fact_production"
//! from_column = "station_id"
//! to_table = "dim_stations"
//! to_column = "station_id"
//! ```
//!
//! The dataset document maps table names to arrays of row objects:
//!
//! ```json
//! { "dim_stations": [ { "station_id": "STN-01", "target_cycle_time_min": 45 } ] }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{
    Column, DataType, Dataset, Relationship, Row, Schema, SchemaError, Table, TableDef,
};

/// Errors raised while loading a dataset. Fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("failed to parse dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("manifest table '{0}' is missing from the dataset")]
    MissingTable(String),
}

/// Per-table manifest entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableEntry {
    /// Key column, required for tables on the dimension side of a
    /// relationship.
    #[serde(default)]
    pub key: Option<String>,
}

/// Declared relationship entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipEntry {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// The loader manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub tables: HashMap<String, TableEntry>,
    #[serde(default)]
    pub relationships: Vec<RelationshipEntry>,
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn parse(text: &str) -> Result<Self, LoaderError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

/// Parse a JSON dataset document (table name to array of row objects).
pub fn load_tables(json: &str) -> Result<Dataset, LoaderError> {
    let raw: HashMap<String, Vec<Row>> = serde_json::from_str(json)?;
    let mut dataset = Dataset::new();
    for (name, rows) in raw {
        dataset.insert(Table::with_rows(name, rows));
    }
    Ok(dataset)
}

/// Build the schema and dataset from a manifest and a JSON dataset document.
///
/// Every table in the dataset is registered with column definitions inferred
/// from its rows; the manifest supplies dimension keys and relationships.
/// Manifest tables absent from the dataset are an error.
pub fn load_dataset(manifest: &Manifest, json: &str) -> Result<(Schema, Dataset), LoaderError> {
    let dataset = load_tables(json)?;

    for name in manifest.tables.keys() {
        if !dataset.contains(name) {
            return Err(LoaderError::MissingTable(name.clone()));
        }
    }

    let mut schema = Schema::new();
    let mut names: Vec<&str> = dataset.table_names().collect();
    names.sort_unstable();
    for name in names {
        let Some(table) = dataset.get(name) else {
            continue;
        };
        let mut def = TableDef::new(name, infer_columns(table));
        if let Some(entry) = manifest.tables.get(name) {
            if let Some(key) = &entry.key {
                def = def.with_key(key);
            }
        }
        schema.register_table(def)?;
    }

    for rel in &manifest.relationships {
        schema.register_relationship(Relationship::many_to_one(
            &rel.from_table,
            &rel.from_column,
            &rel.to_table,
            &rel.to_column,
        ))?;
    }

    Ok((schema, dataset))
}

/// Read manifest and dataset files and assemble both halves.
pub fn load_dataset_from_paths(
    manifest_path: impl AsRef<Path>,
    dataset_path: impl AsRef<Path>,
) -> Result<(Schema, Dataset), LoaderError> {
    let manifest = Manifest::from_path(manifest_path)?;
    let dataset_path = dataset_path.as_ref();
    let json = fs::read_to_string(dataset_path).map_err(|source| LoaderError::Io {
        path: dataset_path.to_path_buf(),
        source,
    })?;
    load_dataset(&manifest, &json)
}

/// Infer column definitions from row data. The first non-null value of a
/// column decides its type; all-null columns fall back to text.
fn infer_columns(table: &Table) -> Vec<Column> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for row in &table.rows {
        names.extend(row.keys().map(|k| k.as_str()));
    }

    names
        .into_iter()
        .map(|name| {
            let data_type = table
                .rows
                .iter()
                .find_map(|row| row.get(name).and_then(DataType::of))
                .unwrap_or(DataType::Text);
            Column::new(name, data_type)
        })
        .collect()
}
