//! Throughput measures over the production fact.

use crate::semantic::{Constraint, Expr, Measure, Predicate};

use super::FACT_PRODUCTION;

fn quality_result(result: &str) -> Constraint {
    Constraint::new(FACT_PRODUCTION, "quality_result", Predicate::equals(result))
}

pub(crate) fn measures() -> Vec<Measure> {
    vec![
        Measure::new("TotalUnits", Expr::count_rows(FACT_PRODUCTION))
            .with_description("Production records in the current view"),
        Measure::new(
            "UnitsPassed",
            Expr::calculate(Expr::measure("TotalUnits"), vec![quality_result("Pass")]),
        )
        .with_description("Units that passed inspection"),
        Measure::new(
            "UnitsFailed",
            Expr::calculate(Expr::measure("TotalUnits"), vec![quality_result("Fail")]),
        )
        .with_description("Units that failed inspection"),
        Measure::new(
            "DefectRate",
            Expr::divide(Expr::measure("UnitsFailed"), Expr::measure("TotalUnits"), 0.0),
        )
        .with_description("Failed units as a share of all units"),
        Measure::new(
            "AvgCycleTime",
            Expr::average(FACT_PRODUCTION, "cycle_time_min"),
        )
        .with_description("Mean cycle time (minutes)"),
        Measure::new(
            "AvgQueueTime",
            Expr::average(FACT_PRODUCTION, "queue_time_min"),
        )
        .with_description("Mean queue time (minutes)"),
        Measure::new(
            "AvgSetupTime",
            Expr::average(FACT_PRODUCTION, "setup_time_min"),
        )
        .with_description("Mean setup time (minutes)"),
        Measure::new(
            "AvgTotalTime",
            Expr::average(FACT_PRODUCTION, "total_time_min"),
        )
        .with_description("Mean total time per record (minutes)"),
        Measure::new(
            "ThroughputPerDay",
            Expr::divide(
                Expr::measure("TotalUnits"),
                Expr::distinct_count(FACT_PRODUCTION, "date"),
                0.0,
            ),
        )
        .with_description("Units per active production day"),
    ]
}
