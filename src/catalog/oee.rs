//! OEE: availability, performance, and quality rolled into one score.

use crate::semantic::{Expr, Measure};

use super::{DIM_STATIONS, FACT_PRODUCTION};

/// Two staffed shifts, 06:00-22:00. A business constant of the line, not
/// derived from shift-calendar data.
const OPERATING_HOURS_PER_DAY: f64 = 16.0;

pub(crate) fn measures() -> Vec<Measure> {
    vec![
        Measure::new(
            "PlannedHours",
            Expr::distinct_count(FACT_PRODUCTION, "date")
                .mul(Expr::lit(OPERATING_HOURS_PER_DAY)),
        )
        .with_description("Active production days times the 16-hour operating day"),
        Measure::new(
            "Availability",
            Expr::divide(
                Expr::measure("PlannedHours").sub(Expr::measure("TotalDowntimeHours")),
                Expr::measure("PlannedHours"),
                0.0,
            ),
        )
        .with_description("Share of planned hours not lost to downtime"),
        Measure::new(
            "PerformanceRatio",
            Expr::divide(
                Expr::sum_x(FACT_PRODUCTION, Expr::column(FACT_PRODUCTION, "cycle_time_min")),
                Expr::sum_x(
                    FACT_PRODUCTION,
                    Expr::related(DIM_STATIONS, "target_cycle_time_min"),
                ),
                0.0,
            ),
        )
        .with_description("Actual versus target cycle time, weighted per record"),
        // Single-station variant: the unweighted station-target average only
        // lines up with the records in view when the context pins one station.
        Measure::new(
            "Performance",
            Expr::divide(
                Expr::measure("AvgCycleTime"),
                Expr::average(DIM_STATIONS, "target_cycle_time_min"),
                0.0,
            ),
        )
        .with_description("Actual versus target cycle time for a single station"),
        Measure::new(
            "QualityRate",
            Expr::divide(Expr::measure("UnitsPassed"), Expr::measure("TotalUnits"), 0.0),
        )
        .with_description("Share of units passing inspection"),
        // The performance factor enters as a reciprocal: cycling faster than
        // target (ratio below 1) raises the score.
        Measure::new(
            "OEE",
            Expr::measure("Availability")
                .mul(Expr::divide(
                    Expr::lit(1.0),
                    Expr::measure("PerformanceRatio"),
                    0.0,
                ))
                .mul(Expr::measure("QualityRate")),
        )
        .with_description("Availability x performance x quality"),
    ]
}
