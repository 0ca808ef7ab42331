use gauge::semantic::{Expr, Measure, MeasureRegistry, RegistryError};

#[test]
fn test_build_resolves_cross_measure_references() {
    let registry = MeasureRegistry::build(vec![
        Measure::new("TotalUnits", Expr::count_rows("fact_production")),
        Measure::new(
            "UnitsFailed",
            Expr::count_rows("fact_production"), // stand-in body
        ),
        Measure::new(
            "DefectRate",
            Expr::divide(Expr::measure("UnitsFailed"), Expr::measure("TotalUnits"), 0.0),
        ),
    ])
    .unwrap();

    assert_eq!(registry.len(), 3);
    assert!(registry.contains("DefectRate"));
    // definition order is preserved for listings
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["TotalUnits", "UnitsFailed", "DefectRate"]);
}

#[test]
fn test_duplicate_measure_rejected() {
    let result = MeasureRegistry::build(vec![
        Measure::new("TotalUnits", Expr::count_rows("fact_production")),
        Measure::new("TotalUnits", Expr::count_rows("fact_alarms")),
    ]);
    assert_eq!(
        result.err(),
        Some(RegistryError::DuplicateMeasure("TotalUnits".into()))
    );
}

#[test]
fn test_reference_to_unregistered_measure_rejected() {
    let result = MeasureRegistry::build(vec![Measure::new(
        "DefectRate",
        Expr::divide(Expr::measure("UnitsFailed"), Expr::measure("TotalUnits"), 0.0),
    )]);
    assert_eq!(
        result.err(),
        Some(RegistryError::UnknownMeasure {
            measure: "DefectRate".into(),
            referenced: "UnitsFailed".into(),
        })
    );
}

#[test]
fn test_two_measure_cycle_rejected() {
    let result = MeasureRegistry::build(vec![
        Measure::new("A", Expr::measure("B")),
        Measure::new("B", Expr::measure("A")),
    ]);
    match result {
        Err(RegistryError::CyclicDependency(cycle)) => {
            assert_eq!(cycle.len(), 2);
            assert!(cycle.contains(&"A".to_string()));
            assert!(cycle.contains(&"B".to_string()));
        }
        other => panic!("expected cycle error, got {:?}", other),
    }
}

#[test]
fn test_self_reference_rejected() {
    let result = MeasureRegistry::build(vec![Measure::new(
        "Recursive",
        Expr::measure("Recursive").add(Expr::lit(1.0)),
    )]);
    assert!(matches!(
        result,
        Err(RegistryError::CyclicDependency(cycle)) if cycle == vec!["Recursive".to_string()]
    ));
}

#[test]
fn test_references_inside_nested_nodes_are_found() {
    // the reference sits under CALCULATE -> DIVIDE -> SUMX
    let expr = Expr::calculate(
        Expr::divide(
            Expr::sum_x("fact_production", Expr::measure("Ghost")),
            Expr::lit(1.0),
            0.0,
        ),
        vec![],
    );
    let result = MeasureRegistry::build(vec![Measure::new("Nested", expr)]);
    assert!(matches!(
        result,
        Err(RegistryError::UnknownMeasure { referenced, .. }) if referenced == "Ghost"
    ));
}
