//! Module: value
//! Responsibility: typed column values, conversion policy, canonical equality and ordering.
//! Does not own: row layout or selector resolution.
//! Boundary: every raw column read by the engine flows through `Value`.

mod compare;
mod convert;
mod hash;


use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use std::{
    fmt,
    hash::{Hash, Hasher},
};
use uuid::Uuid;

// re-exports
pub use compare::strict_order_cmp;
pub use convert::{ConversionError, ValueType};
pub(crate) use hash::{StableHash, hash_key_tuple};

pub use hash::hash_value;

#[cfg(test)]
pub(crate) use hash::with_test_hash_override;

///
/// ValueKind
///
/// Raw representation family of one `Value`.
/// Used for error reporting and canonical hashing tags.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ValueKind {
    #[display("null")]
    Null,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("float64")]
    Float64,
    #[display("decimal")]
    Decimal,
    #[display("text")]
    Text,
    #[display("timestamp")]
    Timestamp,
    #[display("uuid")]
    Uuid,
    #[display("blob")]
    Blob,
}

impl ValueKind {
    /// Return true for the kinds that share canonical numeric equality.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float64 | Self::Decimal)
    }

    /// Canonical hashing tag.
    ///
    /// Every numeric kind shares one tag so `Int(1)`, `Decimal(1.0)` and
    /// `Float64(1.0)` land in the same bucket.
    #[must_use]
    pub(crate) const fn canonical_tag(self) -> u8 {
        match self {
            Self::Null => 0x00,
            Self::Bool => 0x01,
            Self::Int | Self::Float64 | Self::Decimal => 0x02,
            Self::Text => 0x03,
            Self::Timestamp => 0x04,
            Self::Uuid => 0x05,
            Self::Blob => 0x06,
        }
    }
}

///
/// Value
///
/// One raw column value read from a source row.
///
/// Null        → SQL NULL or a missing column.
/// Numeric     → Int / Float64 / Decimal, equal across representations
///               when they denote the same number.
///

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float64(f64),
    Decimal(Decimal),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Blob(Vec<u8>),
}

impl Value {
    /// Return the representation family of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float64(_) => ValueKind::Float64,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Blob(_) => ValueKind::Blob,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// Build a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        compare::canonical_eq(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(hash::stable_hash_value(self));
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Timestamp(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Uuid(v) => write!(f, "{}", v.hyphenated()),
            Self::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

///
/// CONVERSIONS
///

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    /// Map one JSON scalar onto a column value.
    ///
    /// Integers that fit `i64` stay integral, larger integers become decimals
    /// and everything else numeric becomes `Float64`. Arrays and objects are
    /// kept as their JSON text.
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Decimal(Decimal::from(u))
                } else {
                    n.as_f64().map_or(Self::Null, Self::Float64)
                }
            }
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Self::Text(value.to_string())
            }
        }
    }
}
