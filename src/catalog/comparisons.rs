//! Shift and priority comparison measures.
//!
//! Each of these recomputes `DefectRate` under an overridden context, so a
//! dashboard can put all three shifts side by side regardless of the view's
//! own shift filter.

use crate::semantic::{Constraint, Expr, Measure, Predicate};

use super::FACT_PRODUCTION;

fn shift(name: &str) -> Constraint {
    Constraint::new(FACT_PRODUCTION, "shift", Predicate::equals(name))
}

fn shift_defect_rate(shift_name: &str) -> Expr {
    Expr::calculate(Expr::measure("DefectRate"), vec![shift(shift_name)])
}

pub(crate) fn measures() -> Vec<Measure> {
    vec![
        Measure::new("DayShiftDefectRate", shift_defect_rate("Day"))
            .with_description("Defect rate pinned to the day shift"),
        Measure::new("SwingShiftDefectRate", shift_defect_rate("Swing"))
            .with_description("Defect rate pinned to the swing shift"),
        Measure::new("NightShiftDefectRate", shift_defect_rate("Night"))
            .with_description("Defect rate pinned to the night shift"),
        Measure::new(
            "RushDefectRate",
            Expr::calculate(
                Expr::measure("DefectRate"),
                vec![Constraint::new(
                    FACT_PRODUCTION,
                    "priority",
                    Predicate::is_in(["Rush", "Critical"]),
                )],
            ),
        )
        .with_description("Defect rate for expedited orders"),
        Measure::new(
            "StandardDefectRate",
            Expr::calculate(
                Expr::measure("DefectRate"),
                vec![Constraint::new(
                    FACT_PRODUCTION,
                    "priority",
                    Predicate::equals("Standard"),
                )],
            ),
        )
        .with_description("Defect rate for standard orders"),
        Measure::new(
            "RushCostPremium",
            Expr::divide(
                Expr::measure("RushDefectRate"),
                Expr::measure("StandardDefectRate"),
                0.0,
            )
            .sub(Expr::lit(1.0)),
        )
        .with_description("Excess rush defect rate over standard, as a ratio minus one"),
    ]
}
