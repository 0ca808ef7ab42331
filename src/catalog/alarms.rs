//! Alarm and sensor measures.

use crate::semantic::{Constraint, Expr, Measure, Predicate};

use super::{FACT_ALARMS, FACT_SENSOR_READINGS};

fn alarm_type(kind: &str) -> Constraint {
    Constraint::new(FACT_ALARMS, "alarm_type", Predicate::equals(kind))
}

pub(crate) fn measures() -> Vec<Measure> {
    vec![
        Measure::new("TotalAlarms", Expr::count_rows(FACT_ALARMS))
            .with_description("Threshold breaches in the current view"),
        Measure::new(
            "HighAlarms",
            Expr::calculate(Expr::measure("TotalAlarms"), vec![alarm_type("High")]),
        )
        .with_description("High-threshold breaches"),
        Measure::new(
            "LowAlarms",
            Expr::calculate(Expr::measure("TotalAlarms"), vec![alarm_type("Low")]),
        )
        .with_description("Low-threshold breaches"),
        Measure::new(
            "AlarmsPerDay",
            Expr::divide(
                Expr::measure("TotalAlarms"),
                Expr::distinct_count(FACT_ALARMS, "date"),
                0.0,
            ),
        )
        .with_description("Alarms per day with alarm activity"),
        Measure::new("SensorReadings", Expr::count_rows(FACT_SENSOR_READINGS))
            .with_description("Sensor samples in the current view"),
        Measure::new(
            "AvgSensorValue",
            Expr::average(FACT_SENSOR_READINGS, "value"),
        )
        .with_description("Mean sensor reading"),
    ]
}
