use crate::{
    predicate::{CompareOp, ComparePredicate, Predicate},
    row::FieldSource,
    value::{Value, strict_order_cmp},
};
use std::cmp::Ordering;

///
/// Evaluate a predicate against a single row.
///
/// This function performs **pure runtime evaluation**:
/// - no descriptor access
/// - no selector casts; columns are compared as read
///
/// Any unsupported comparison simply evaluates to `false`.
///
#[must_use]
pub(crate) fn eval<R: FieldSource + ?Sized>(row: &R, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,

        Predicate::And(children) => children.iter().all(|child| eval(row, child)),
        Predicate::Or(children) => children.iter().any(|child| eval(row, child)),
        Predicate::Not(inner) => !eval(row, inner),

        Predicate::Compare(cmp) => eval_compare(row, cmp),

        Predicate::IsNull { column } => row.field(column).is_null(),
        Predicate::IsNotNull { column } => !row.field(column).is_null(),
    }
}

///
/// Evaluate a single comparison predicate against a row.
///
/// Returns `false` if:
/// - either side is null
/// - the two sides belong to incomparable families
///
fn eval_compare<R: FieldSource + ?Sized>(row: &R, cmp: &ComparePredicate) -> bool {
    let ComparePredicate { column, op, value } = cmp;
    let actual = row.field(column);

    // NOTE: comparison helpers return None when a comparison is invalid; eval treats that as false.
    match op {
        CompareOp::Eq => compare_eq(actual, value).unwrap_or(false),
        CompareOp::Ne => compare_eq(actual, value).is_some_and(|eq| !eq),

        CompareOp::Lt => compare_order(actual, value).is_some_and(Ordering::is_lt),
        CompareOp::Lte => compare_order(actual, value).is_some_and(Ordering::is_le),
        CompareOp::Gt => compare_order(actual, value).is_some_and(Ordering::is_gt),
        CompareOp::Gte => compare_order(actual, value).is_some_and(Ordering::is_ge),
    }
}

fn compare_eq(actual: &Value, expected: &Value) -> Option<bool> {
    if !comparable(actual, expected) {
        return None;
    }

    Some(actual == expected)
}

fn compare_order(actual: &Value, expected: &Value) -> Option<Ordering> {
    if !comparable(actual, expected) {
        return None;
    }

    strict_order_cmp(actual, expected)
}

// Null never compares; numeric kinds compare across representations.
fn comparable(left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }

    left.kind() == right.kind() || (left.is_numeric() && right.is_numeric())
}
