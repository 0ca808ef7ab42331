//! Cost rollups across production, quality, and downtime facts.

use crate::semantic::{Expr, Measure};

use super::{FACT_DOWNTIME, FACT_PRODUCTION, FACT_QUALITY_EVENTS};

pub(crate) fn measures() -> Vec<Measure> {
    vec![
        Measure::new("TotalMachineCost", Expr::sum(FACT_PRODUCTION, "machine_cost"))
            .with_description("Machine time cost"),
        Measure::new("TotalLaborCost", Expr::sum(FACT_PRODUCTION, "labor_cost"))
            .with_description("Direct labor cost"),
        Measure::new(
            "TotalMaterialCost",
            Expr::sum(FACT_PRODUCTION, "material_cost"),
        )
        .with_description("Material cost"),
        Measure::new(
            "TotalProductionCost",
            Expr::measure("TotalMachineCost")
                .add(Expr::measure("TotalLaborCost"))
                .add(Expr::measure("TotalMaterialCost")),
        )
        .with_description("Machine, labor, and material cost combined"),
        Measure::new(
            "TotalReworkCost",
            Expr::sum(FACT_QUALITY_EVENTS, "rework_cost"),
        )
        .with_description("Cost of reworking defective units"),
        Measure::new("TotalScrapCost", Expr::sum(FACT_QUALITY_EVENTS, "scrap_cost"))
            .with_description("Cost of scrapped units"),
        Measure::new(
            "TotalQualityCost",
            Expr::sum(FACT_QUALITY_EVENTS, "total_quality_cost"),
        )
        .with_description("Rework plus scrap cost as recorded per event"),
        Measure::new(
            "TotalDowntimeCost",
            Expr::sum(FACT_DOWNTIME, "total_downtime_cost"),
        )
        .with_description("Lost production plus repair cost"),
        Measure::new(
            "CostPerUnit",
            Expr::divide(
                Expr::measure("TotalProductionCost"),
                Expr::measure("TotalUnits"),
                0.0,
            ),
        )
        .with_description("Production cost per unit"),
        Measure::new(
            "CostOfPoorQuality",
            Expr::measure("TotalQualityCost").add(Expr::measure("TotalDowntimeCost")),
        )
        .with_description("Quality cost plus downtime cost"),
    ]
}
