//! Per-group aggregate reducers.
//!
//! One `AggregateState` exists per (group, aggregate spec). Updates are
//! deterministic; finalization derives the output value once the stream ends.

use crate::{
    descriptor::AggregateKind,
    value::{ConversionError, Value, ValueType, strict_order_cmp},
};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;

///
/// NumericSum
///
/// Running sum that widens as contributions require it:
/// integral until an i64 overflow or a decimal contribution, float once any
/// float contributes.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum NumericSum {
    Int(i64),
    Decimal(Decimal),
    Float(f64),
}

impl NumericSum {
    pub(crate) const ZERO: Self = Self::Int(0);

    /// Fold one non-null value into the sum.
    pub(crate) fn add(self, value: &Value) -> Result<Self, ConversionError> {
        let next = match (self, value) {
            (Self::Float(acc), _) => Self::Float(acc + value.as_float64()?),
            (_, Value::Float64(v)) => Self::Float(self.to_f64() + v),

            (Self::Int(acc), Value::Int(v)) => match acc.checked_add(*v) {
                Some(sum) => Self::Int(sum),
                None => Self::Decimal(decimal_add(Decimal::from(acc), Decimal::from(*v))?),
            },
            (Self::Int(acc), Value::Decimal(v)) => Self::Decimal(decimal_add(Decimal::from(acc), *v)?),
            (Self::Decimal(acc), Value::Int(v)) => Self::Decimal(decimal_add(acc, Decimal::from(*v))?),
            (Self::Decimal(acc), Value::Decimal(v)) => Self::Decimal(decimal_add(acc, *v)?),

            // non-numeric sources (text, bool) fold through decimal conversion
            (acc, other) => return acc.add(&Value::Decimal(other.as_decimal()?)),
        };

        Ok(next)
    }

    fn to_f64(self) -> f64 {
        match self {
            Self::Int(v) => v.to_f64().unwrap_or(f64::NAN),
            Self::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
            Self::Float(v) => v,
        }
    }

    #[must_use]
    pub(crate) const fn into_value(self) -> Value {
        match self {
            Self::Int(v) => Value::Int(v),
            Self::Decimal(v) => Value::Decimal(v),
            Self::Float(v) => Value::Float64(v),
        }
    }

    /// `sum / count`, or zero when nothing contributed.
    pub(crate) fn average(self, count: u64) -> Result<Value, ConversionError> {
        if count == 0 {
            return Ok(match self {
                Self::Float(_) => Value::Float64(0.0),
                Self::Int(_) | Self::Decimal(_) => Value::Decimal(Decimal::ZERO),
            });
        }

        let value = match self {
            Self::Float(sum) => Value::Float64(sum / count.to_f64().unwrap_or(f64::MAX)),
            Self::Int(sum) => Value::Decimal(decimal_div(Decimal::from(sum), count)?),
            Self::Decimal(sum) => Value::Decimal(decimal_div(sum, count)?),
        };

        Ok(value)
    }
}

fn decimal_add(left: Decimal, right: Decimal) -> Result<Decimal, ConversionError> {
    left.checked_add(right).ok_or(ConversionError::Overflow {
        target: ValueType::Decimal,
    })
}

fn decimal_div(sum: Decimal, count: u64) -> Result<Decimal, ConversionError> {
    sum.checked_div(Decimal::from(count))
        .map(|avg| avg.normalize())
        .ok_or(ConversionError::Overflow {
            target: ValueType::Decimal,
        })
}

///
/// AggregateState
///
/// Reducer state for one aggregate of one group.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AggregateState {
    Count(u64),
    Sum(NumericSum),
    Avg { sum: NumericSum, count: u64 },
    Min(Option<Value>),
    Max(Option<Value>),
}

impl AggregateState {
    /// Build the initial reducer state for one aggregate kind.
    #[must_use]
    pub(crate) const fn for_kind(kind: AggregateKind) -> Self {
        match kind {
            AggregateKind::Count => Self::Count(0),
            AggregateKind::Sum => Self::Sum(NumericSum::ZERO),
            AggregateKind::Avg => Self::Avg {
                sum: NumericSum::ZERO,
                count: 0,
            },
            AggregateKind::Min => Self::Min(None),
            AggregateKind::Max => Self::Max(None),
        }
    }

    /// Count one row that passed the filter.
    pub(crate) const fn count_row(&mut self) {
        if let Self::Count(count) = self {
            *count = count.saturating_add(1);
        }
    }

    /// Fold one sourced value. Null values are skipped.
    pub(crate) fn apply(&mut self, value: Value) -> Result<(), ConversionError> {
        if value.is_null() {
            return Ok(());
        }

        match self {
            Self::Count(_) => {}
            Self::Sum(sum) => *sum = sum.add(&value)?,
            Self::Avg { sum, count } => {
                *sum = sum.add(&value)?;
                *count = count.saturating_add(1);
            }
            Self::Min(current) => replace_if(current, value, Ordering::is_lt)?,
            Self::Max(current) => replace_if(current, value, Ordering::is_gt)?,
        }

        Ok(())
    }

    /// Derive the output value of this reducer.
    pub(crate) fn finalize(self) -> Result<Value, ConversionError> {
        match self {
            Self::Count(count) => Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX))),
            Self::Sum(sum) => Ok(sum.into_value()),
            Self::Avg { sum, count } => sum.average(count),
            Self::Min(value) | Self::Max(value) => Ok(value.unwrap_or(Value::Null)),
        }
    }
}

// Seed on the first value, then replace when `candidate` orders as `wins`.
fn replace_if(
    current: &mut Option<Value>,
    candidate: Value,
    wins: fn(Ordering) -> bool,
) -> Result<(), ConversionError> {
    let Some(existing) = current.as_ref() else {
        *current = Some(candidate);
        return Ok(());
    };

    let ordering =
        strict_order_cmp(&candidate, existing).ok_or(ConversionError::Incomparable {
            left: candidate.kind(),
            right: existing.kind(),
        })?;
    if wins(ordering) {
        *current = Some(candidate);
    }

    Ok(())
}

///
/// TESTS
///
