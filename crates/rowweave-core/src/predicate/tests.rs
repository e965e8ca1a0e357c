use crate::{
    naming::NamingConvention,
    predicate::{Predicate, eval},
    row::{ResolvedRow, Row},
    value::Value,
};
use rust_decimal::Decimal;

fn listing() -> Row {
    Row::new()
        .with("make", "Toyota")
        .with("price", 25_000)
        .with("discount", Value::Null)
        .with("rating", Decimal::new(45, 1))
}

#[test]
fn compare_ops_follow_numeric_order_across_representations() {
    let row = listing();

    assert!(eval(&row, &Predicate::gt("price", 20_000)));
    assert!(eval(&row, &Predicate::gte("price", Decimal::new(250_000, 1))));
    assert!(eval(&row, &Predicate::lt("rating", 5.0)));
    assert!(eval(&row, &Predicate::eq("rating", 4.5)));
    assert!(!eval(&row, &Predicate::lte("price", 10)));
}

#[test]
fn null_operands_never_match_a_comparison() {
    let row = listing();

    assert!(!eval(&row, &Predicate::eq("discount", 0)));
    assert!(!eval(&row, &Predicate::ne("discount", 0)));
    assert!(!eval(&row, &Predicate::gt("missing", 0)));
    assert!(!eval(&row, &Predicate::eq("price", Value::Null)));
}

#[test]
fn incomparable_families_evaluate_false_both_ways() {
    let row = listing();

    assert!(!eval(&row, &Predicate::eq("price", "25000")));
    assert!(!eval(&row, &Predicate::ne("price", "25000")));
    assert!(!eval(&row, &Predicate::lt("make", 3)));
}

#[test]
fn null_checks_treat_missing_columns_as_null() {
    let row = listing();

    assert!(eval(&row, &Predicate::is_null("discount")));
    assert!(eval(&row, &Predicate::is_null("missing")));
    assert!(eval(&row, &Predicate::is_not_null("make")));
}

#[test]
fn boolean_combinators_short_circuit_to_expected_results() {
    let row = listing();
    let toyota_over_20k = Predicate::and(vec![
        Predicate::eq("make", "Toyota"),
        Predicate::gt("price", 20_000),
    ]);

    assert!(eval(&row, &toyota_over_20k));
    assert!(!eval(&row, &Predicate::not(toyota_over_20k)));
    assert!(eval(
        &row,
        &Predicate::or(vec![Predicate::False, Predicate::eq("make", "Toyota")])
    ));
    assert!(eval(&row, &Predicate::and(Vec::new())));
    assert!(!eval(&row, &Predicate::or(Vec::new())));
}

#[test]
fn predicates_resolve_columns_through_naming() {
    let row = Row::new().with("unit_price", 12);
    let resolved = ResolvedRow::new(&row, NamingConvention::SnakeCase);

    assert!(eval(&resolved, &Predicate::eq("UnitPrice", 12)));
    assert!(!eval(&row, &Predicate::eq("UnitPrice", 12)));
}

#[test]
fn columns_are_collected_once_in_first_seen_order() {
    let predicate = Predicate::and(vec![
        Predicate::gt("price", 0),
        Predicate::not(Predicate::is_null("make")),
        Predicate::lt("price", 100),
    ]);

    assert_eq!(predicate.columns(), vec!["price", "make"]);
}
