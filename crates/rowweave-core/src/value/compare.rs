use crate::value::Value;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::{cmp::Ordering, str::FromStr};

///
/// NumericKey
///
/// Canonical numeric identity shared by `Int`, `Decimal` and `Float64`.
///
/// Invariant:
/// - `Exact` carries a normalized decimal (no trailing zeros, no `-0`)
/// - `Float` carries the bit pattern of a float whose shortest round-trip
///   text has no exact decimal form, with every NaN folded to one
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NumericKey {
    Exact(Decimal),
    Float(u64),
}

impl NumericKey {
    /// Resolve the canonical numeric identity of one value.
    /// Returns `None` for non-numeric values.
    #[must_use]
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(Self::Exact(Decimal::from(*v))),
            Value::Decimal(v) => Some(Self::Exact(v.normalize())),
            Value::Float64(v) => Some(float_key(*v)),
            _ => None,
        }
    }
}

fn float_key(value: f64) -> NumericKey {
    if value.is_nan() {
        return NumericKey::Float(f64::NAN.to_bits());
    }

    match exact_decimal(value) {
        Some(exact) => NumericKey::Exact(exact.normalize()),
        None => NumericKey::Float(value.to_bits()),
    }
}

/// Exact decimal form of a finite float, built from its shortest round-trip
/// text. `None` when that text does not fit a decimal without rounding.
pub(crate) fn exact_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }

    Decimal::from_str(&value.to_string())
        .ok()
        .filter(|decimal| f64::from_str(&decimal.to_string()) == Ok(value))
}

/// Canonical equality used by grouping keys and `Value: Eq`.
///
/// Numeric values compare by canonical numeric identity; every other
/// family compares by raw value, and mixed families are never equal.
#[must_use]
pub(crate) fn canonical_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
        (Value::Uuid(a), Value::Uuid(b)) => a == b,
        (Value::Blob(a), Value::Blob(b)) => a == b,
        _ => match (NumericKey::of(left), NumericKey::of(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Strict comparator for orderable value pairs.
///
/// Numeric values order by value across representations. Same-family
/// values order naturally. Returns `None` for mismatched families, nulls
/// against non-nulls, and NaN operands.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
        (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
        _ => numeric_cmp(left, right),
    }
}

fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (NumericKey::of(left)?, NumericKey::of(right)?) {
        (NumericKey::Exact(a), NumericKey::Exact(b)) => Some(a.cmp(&b)),
        _ => as_f64(left)?.partial_cmp(&as_f64(right)?),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(v) => v.to_f64(),
        Value::Decimal(v) => v.to_f64(),
        Value::Float64(v) => Some(*v),
        _ => None,
    }
}
