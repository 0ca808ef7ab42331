use gauge::loader::{load_dataset, load_tables, LoaderError, Manifest};
use gauge::model::{DataType, SchemaError, Value};
use gauge::semantic::{Evaluator, Expr, FilterContext, Measure, MeasureRegistry};

const MANIFEST: &str = r#"
[tables.fact_production]

[tables.dim_stations]
key = "station_id"

[[relationships]]
from_table = "fact_production"
from_column = "station_id"
to_table = "dim_stations"
to_column = "station_id"
"#;

const TABLES: &str = r#"
{
    "fact_production": [
        { "station_id": "STN-01", "date": "2024-04-01", "shift": "Day",
          "cycle_time_min": 44.5, "quality_result": "Pass" },
        { "station_id": "STN-02", "date": "2024-04-02", "shift": "Night",
          "cycle_time_min": null, "quality_result": "Fail" }
    ],
    "dim_stations": [
        { "station_id": "STN-01", "target_cycle_time_min": 40, "is_bottleneck": false },
        { "station_id": "STN-02", "target_cycle_time_min": 60, "is_bottleneck": true }
    ]
}
"#;

#[test]
fn test_manifest_parses() {
    let manifest = Manifest::parse(MANIFEST).unwrap();
    assert_eq!(manifest.tables.len(), 2);
    assert_eq!(manifest.tables["dim_stations"].key.as_deref(), Some("station_id"));
    assert!(manifest.tables["fact_production"].key.is_none());
    assert_eq!(manifest.relationships.len(), 1);
    assert_eq!(manifest.relationships[0].to_table, "dim_stations");
}

#[test]
fn test_invalid_manifest_is_a_parse_error() {
    let result = Manifest::parse("[tables\nkey=");
    assert!(matches!(result, Err(LoaderError::Manifest(_))));
}

#[test]
fn test_load_tables_parses_rows_and_nulls() {
    let dataset = load_tables(TABLES).unwrap();
    assert_eq!(dataset.len(), 2);

    let production = dataset.get("fact_production").unwrap();
    assert_eq!(production.len(), 2);
    assert_eq!(production.rows[0]["cycle_time_min"], Value::Number(44.5));
    assert!(production.rows[1]["cycle_time_min"].is_null());
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    assert!(matches!(
        load_tables("{ not json"),
        Err(LoaderError::Dataset(_))
    ));
}

#[test]
fn test_load_dataset_infers_columns_and_registers_relationships() {
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let (schema, dataset) = load_dataset(&manifest, TABLES).unwrap();

    let production = schema.table("fact_production").unwrap();
    assert_eq!(
        production.column("cycle_time_min").unwrap().data_type,
        DataType::Number
    );
    assert_eq!(production.column("date").unwrap().data_type, DataType::Date);
    assert_eq!(production.column("shift").unwrap().data_type, DataType::Text);

    let stations = schema.table("dim_stations").unwrap();
    assert_eq!(stations.key.as_deref(), Some("station_id"));
    assert_eq!(
        stations.column("is_bottleneck").unwrap().data_type,
        DataType::Boolean
    );

    assert!(schema.relationship("fact_production", "dim_stations").is_some());
    assert_eq!(dataset.get("fact_production").unwrap().len(), 2);
}

#[test]
fn test_manifest_table_missing_from_dataset() {
    let manifest = Manifest::parse(
        r#"
[tables.fact_downtime]
"#,
    )
    .unwrap();
    let result = load_dataset(&manifest, TABLES);
    assert!(matches!(
        result,
        Err(LoaderError::MissingTable(name)) if name == "fact_downtime"
    ));
}

#[test]
fn test_relationship_to_keyless_dimension_fails_at_load() {
    let manifest = Manifest::parse(
        r#"
[[relationships]]
from_table = "fact_production"
from_column = "station_id"
to_table = "dim_stations"
to_column = "station_id"
"#,
    )
    .unwrap();
    // no key declared for dim_stations, so the many-to-one check trips
    let result = load_dataset(&manifest, TABLES);
    assert!(matches!(
        result,
        Err(LoaderError::Schema(SchemaError::NotManyToOne { .. }))
    ));
}

/// End to end: load both halves, then evaluate a measure over them.
#[test]
fn test_loaded_dataset_evaluates() {
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let (schema, dataset) = load_dataset(&manifest, TABLES).unwrap();

    let registry = MeasureRegistry::build(vec![
        Measure::new("TotalUnits", Expr::count_rows("fact_production")),
        Measure::new(
            "TargetMinutes",
            Expr::sum_x(
                "fact_production",
                Expr::related("dim_stations", "target_cycle_time_min"),
            ),
        ),
    ])
    .unwrap();

    let evaluator = Evaluator::new(&schema, &dataset, &registry);
    let ctx = FilterContext::empty();
    assert_eq!(evaluator.evaluate("TotalUnits", &ctx).unwrap(), 2.0);
    assert_eq!(evaluator.evaluate("TargetMinutes", &ctx).unwrap(), 100.0);
}
