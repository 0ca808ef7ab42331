//! The built-in manufacturing catalogue: the six-table star schema of the
//! assembly-line extracts and the standard measure set computed over it.
//!
//! Table and column names mirror the SCADA line extracts (production runs,
//! downtime events, alarms, sensor readings, quality events, and the station
//! dimension). Each fact carries a `station_id` foreign key into
//! `dim_stations`.

mod alarms;
mod comparisons;
mod cost;
mod downtime;
mod oee;
mod throughput;

use once_cell::sync::Lazy;

use crate::model::{Column, DataType, Relationship, Schema, SchemaError, TableDef};
use crate::semantic::{Measure, MeasureRegistry};

pub const FACT_PRODUCTION: &str = "fact_production";
pub const FACT_DOWNTIME: &str = "fact_downtime";
pub const FACT_ALARMS: &str = "fact_alarms";
pub const FACT_SENSOR_READINGS: &str = "fact_sensor_readings";
pub const FACT_QUALITY_EVENTS: &str = "fact_quality_events";
pub const DIM_STATIONS: &str = "dim_stations";

static STANDARD_SCHEMA: Lazy<Schema> =
    Lazy::new(|| build_schema().expect("builtin star schema is well-formed"));

static STANDARD_REGISTRY: Lazy<MeasureRegistry> = Lazy::new(|| {
    MeasureRegistry::build(standard_measures())
        .expect("builtin measure catalogue is complete and acyclic")
});

/// The star schema of the six built-in tables.
pub fn standard_schema() -> &'static Schema {
    &STANDARD_SCHEMA
}

/// The standard measure catalogue, built once.
pub fn standard_registry() -> &'static MeasureRegistry {
    &STANDARD_REGISTRY
}

/// All standard measures in catalogue order.
pub fn standard_measures() -> Vec<Measure> {
    groups().into_iter().flat_map(|(_, m)| m).collect()
}

/// The catalogue grouped by domain, for listings.
pub fn groups() -> Vec<(&'static str, Vec<Measure>)> {
    vec![
        ("throughput", throughput::measures()),
        ("oee", oee::measures()),
        ("cost", cost::measures()),
        ("downtime", downtime::measures()),
        ("alarms", alarms::measures()),
        ("comparisons", comparisons::measures()),
    ]
}

fn text(name: &str) -> Column {
    Column::new(name, DataType::Text)
}

fn number(name: &str) -> Column {
    Column::new(name, DataType::Number)
}

fn boolean(name: &str) -> Column {
    Column::new(name, DataType::Boolean)
}

fn date(name: &str) -> Column {
    Column::new(name, DataType::Date)
}

fn build_schema() -> Result<Schema, SchemaError> {
    let mut schema = Schema::new();

    schema.register_table(TableDef::new(
        FACT_PRODUCTION,
        vec![
            text("production_id"),
            text("order_id"),
            text("product_id"),
            text("station_id"),
            text("operator_id"),
            date("date"),
            text("shift"),
            text("priority"),
            number("cycle_time_min"),
            number("queue_time_min"),
            number("setup_time_min"),
            number("total_time_min"),
            number("machine_cost"),
            number("labor_cost"),
            number("material_cost"),
            text("quality_result"),
        ],
    ))?;

    schema.register_table(TableDef::new(
        FACT_DOWNTIME,
        vec![
            text("downtime_id"),
            text("station_id"),
            date("date"),
            number("start_hour"),
            text("shift"),
            text("downtime_category"),
            boolean("is_scheduled"),
            number("duration_hours"),
            number("lost_production_cost"),
            number("repair_cost"),
            number("total_downtime_cost"),
        ],
    ))?;

    schema.register_table(TableDef::new(
        FACT_ALARMS,
        vec![
            text("alarm_id"),
            text("timestamp"),
            date("date"),
            text("station_id"),
            text("sensor_id"),
            text("sensor_name"),
            text("alarm_type"),
            number("value"),
            number("threshold"),
            text("shift"),
        ],
    ))?;

    schema.register_table(TableDef::new(
        FACT_SENSOR_READINGS,
        vec![
            text("timestamp"),
            date("date"),
            text("station_id"),
            text("sensor_id"),
            text("sensor_name"),
            number("value"),
            text("unit"),
            text("shift"),
        ],
    ))?;

    schema.register_table(TableDef::new(
        FACT_QUALITY_EVENTS,
        vec![
            text("quality_event_id"),
            text("production_id"),
            text("order_id"),
            text("product_id"),
            text("station_id"),
            text("operator_id"),
            date("date"),
            text("shift"),
            text("defect_type"),
            text("severity"),
            text("disposition"),
            text("root_cause"),
            number("rework_cost"),
            number("scrap_cost"),
            number("total_quality_cost"),
            boolean("corrective_action"),
        ],
    ))?;

    schema.register_table(
        TableDef::new(
            DIM_STATIONS,
            vec![
                text("station_id"),
                text("station_name"),
                text("description"),
                number("line_position"),
                number("num_machines"),
                number("target_cycle_time_min"),
                boolean("is_bottleneck"),
            ],
        )
        .with_key("station_id"),
    )?;

    for fact in [
        FACT_PRODUCTION,
        FACT_DOWNTIME,
        FACT_ALARMS,
        FACT_SENSOR_READINGS,
        FACT_QUALITY_EVENTS,
    ] {
        schema.register_relationship(Relationship::many_to_one(
            fact,
            "station_id",
            DIM_STATIONS,
            "station_id",
        ))?;
    }

    Ok(schema)
}
