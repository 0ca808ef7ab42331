//! Downtime measures: event counts, scheduled/unscheduled hours, MTBF.

use crate::semantic::{Constraint, Expr, Measure, Predicate};

use super::FACT_DOWNTIME;

fn scheduled(flag: bool) -> Constraint {
    Constraint::new(FACT_DOWNTIME, "is_scheduled", Predicate::Bool(flag))
}

pub(crate) fn measures() -> Vec<Measure> {
    vec![
        Measure::new("DowntimeEvents", Expr::count_rows(FACT_DOWNTIME))
            .with_description("Downtime events in the current view"),
        Measure::new(
            "TotalDowntimeHours",
            Expr::sum(FACT_DOWNTIME, "duration_hours"),
        )
        .with_description("Hours lost to downtime"),
        Measure::new(
            "ScheduledDowntimeHours",
            Expr::calculate(Expr::measure("TotalDowntimeHours"), vec![scheduled(true)]),
        )
        .with_description("Downtime hours from scheduled events"),
        Measure::new(
            "UnscheduledDowntimeHours",
            Expr::calculate(Expr::measure("TotalDowntimeHours"), vec![scheduled(false)]),
        )
        .with_description("Downtime hours from unscheduled events"),
        Measure::new(
            "AvgDowntimeDuration",
            Expr::average(FACT_DOWNTIME, "duration_hours"),
        )
        .with_description("Mean event duration (hours)"),
        Measure::new(
            "UnplannedBreakdowns",
            Expr::calculate(
                Expr::measure("DowntimeEvents"),
                vec![Constraint::new(
                    FACT_DOWNTIME,
                    "downtime_category",
                    Predicate::equals("Unplanned Breakdown"),
                )],
            ),
        )
        .with_description("Unplanned breakdown events"),
        Measure::new(
            "MTBF",
            Expr::divide(
                Expr::measure("PlannedHours"),
                Expr::measure("UnplannedBreakdowns"),
                0.0,
            ),
        )
        .with_description("Planned hours per unplanned breakdown"),
    ]
}
