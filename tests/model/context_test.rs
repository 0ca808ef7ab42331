use gauge::model::{row, Row, Table, Value};
use gauge::semantic::{FilterContext, Predicate};

fn production_table() -> Table {
    Table::with_rows(
        "fact_production",
        vec![
            run("Day", "Standard", "Pass"),
            run("Day", "Rush", "Fail"),
            run("Swing", "Critical", "Pass"),
            run("Night", "Standard", "Pass"),
        ],
    )
}

fn run(shift: &str, priority: &str, result: &str) -> Row {
    row(&[
        ("shift", shift.into()),
        ("priority", priority.into()),
        ("quality_result", result.into()),
    ])
}

/// `apply` returns exactly the rows the predicates accept.
#[test]
fn test_apply_selects_exactly_matching_rows() {
    let table = production_table();
    let ctx = FilterContext::empty().with_predicate(
        "fact_production",
        "shift",
        Predicate::equals("Day"),
    );

    let selected: Vec<&Row> = ctx.apply(&table).collect();
    assert_eq!(selected.len(), 2);
    assert!(selected
        .iter()
        .all(|r| r["shift"] == Value::Text("Day".into())));
}

#[test]
fn test_apply_intersects_predicates() {
    let table = production_table();
    let ctx = FilterContext::empty()
        .with_predicate("fact_production", "shift", Predicate::equals("Day"))
        .with_predicate("fact_production", "quality_result", Predicate::equals("Fail"));

    let selected: Vec<&Row> = ctx.apply(&table).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["priority"], Value::Text("Rush".into()));
}

#[test]
fn test_apply_with_set_membership() {
    let table = production_table();
    let ctx = FilterContext::empty().with_predicate(
        "fact_production",
        "priority",
        Predicate::is_in(["Rush", "Critical"]),
    );
    assert_eq!(ctx.apply(&table).count(), 2);
}

#[test]
fn test_apply_is_restartable() {
    let table = production_table();
    let ctx = FilterContext::empty().with_predicate(
        "fact_production",
        "shift",
        Predicate::equals("Day"),
    );
    assert_eq!(ctx.apply(&table).count(), 2);
    // a fresh pass over the same context sees the same rows
    assert_eq!(ctx.apply(&table).count(), 2);
}

#[test]
fn test_empty_context_selects_everything() {
    let table = production_table();
    assert_eq!(FilterContext::empty().apply(&table).count(), 4);
}

#[test]
fn test_boolean_predicate_on_flag_column() {
    let table = Table::with_rows(
        "fact_downtime",
        vec![
            row(&[("is_scheduled", true.into()), ("duration_hours", 2.0.into())]),
            row(&[("is_scheduled", false.into()), ("duration_hours", 3.5.into())]),
        ],
    );
    let ctx = FilterContext::empty().with_predicate(
        "fact_downtime",
        "is_scheduled",
        Predicate::Bool(true),
    );
    let selected: Vec<&Row> = ctx.apply(&table).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["duration_hours"], Value::Number(2.0));
}

#[test]
fn test_override_replaces_only_the_exact_column() {
    let base = FilterContext::empty()
        .with_predicate("fact_production", "shift", Predicate::equals("Day"))
        .with_predicate("fact_production", "priority", Predicate::equals("Standard"));
    let overridden =
        base.with_predicate("fact_production", "shift", Predicate::equals("Night"));

    let table = production_table();
    let selected: Vec<&Row> = overridden.apply(&table).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["shift"], Value::Text("Night".into()));
    // the base context is untouched
    assert_eq!(base.apply(&table).count(), 1);
}
