//! Module: predicate
//! Responsibility: row filters attached to aggregates (`sum(x) where y > 0`).
//! Does not own: selector casts or aggregation; predicates only read raw columns.
//!
//! Pure, schema-agnostic representation. Evaluation never fails: comparisons
//! against null or between incomparable families are simply `false`.

mod eval;

#[cfg(test)]
mod tests;

use crate::value::Value;

pub(crate) use eval::eval;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    #[must_use]
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    IsNull { column: String },
    IsNotNull { column: String },
}

impl Predicate {
    #[must_use]
    pub const fn and(preds: Vec<Self>) -> Self {
        Self::And(preds)
    }

    #[must_use]
    pub const fn or(preds: Vec<Self>) -> Self {
        Self::Or(preds)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(column, CompareOp::Eq, value))
    }

    #[must_use]
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(column, CompareOp::Ne, value))
    }

    #[must_use]
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(column, CompareOp::Lt, value))
    }

    #[must_use]
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(column, CompareOp::Lte, value))
    }

    #[must_use]
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(column, CompareOp::Gt, value))
    }

    #[must_use]
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(column, CompareOp::Gte, value))
    }

    #[must_use]
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
        }
    }

    #[must_use]
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::IsNotNull {
            column: column.into(),
        }
    }

    /// Collect every column this predicate reads, in first-seen order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        let column = match self {
            Self::True | Self::False => return,
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_columns(out);
                }
                return;
            }
            Self::Not(inner) => return inner.collect_columns(out),
            Self::Compare(cmp) => cmp.column.as_str(),
            Self::IsNull { column } | Self::IsNotNull { column } => column.as_str(),
        };

        if !out.contains(&column) {
            out.push(column);
        }
    }
}
