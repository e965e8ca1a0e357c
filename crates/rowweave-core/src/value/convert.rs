//! Module: value::convert
//! Responsibility: total conversion of one `Value` into a requested target type.
//! Does not own: selector resolution or where conversions are requested.
//!
//! Policy:
//! - null never fails; it resolves to the target's zero value or to `None`
//! - numeric widenings always succeed; narrowing truncates toward zero and
//!   fails only when out of range
//! - numeric and bool values always render to text
//! - text converts iff it parses under the target's standard rules

use crate::value::{Value, ValueKind, compare::exact_decimal};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use derive_more::Display;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;
use uuid::Uuid;

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

///
/// ValueType
///
/// Requested target type of one conversion.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[display("bool")]
    Bool,
    #[display("int64")]
    Int64,
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
    #[display("bytes")]
    Bytes,
}

impl ValueType {
    /// Zero value produced when null meets a non-nullable target.
    #[must_use]
    pub fn zero_value(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int64 => Value::Int(0),
            Self::Float64 => Value::Float64(0.0),
            Self::Decimal => Value::Decimal(Decimal::ZERO),
            Self::Text => Value::Text(String::new()),
            Self::Timestamp => Value::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
            Self::Uuid => Value::Uuid(Uuid::nil()),
            Self::Bytes => Value::Blob(Vec::new()),
        }
    }
}

///
/// ConversionError
///
/// A value could not satisfy a requested target type.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConversionError {
    #[error("cannot parse text '{text}' as {target}")]
    Unparseable { text: String, target: ValueType },

    #[error("cannot convert {from} to {target}")]
    Unsupported { from: ValueKind, target: ValueType },

    #[error("{from} value {value} is out of range for {target}")]
    OutOfRange {
        from: ValueKind,
        value: String,
        target: ValueType,
    },

    #[error("numeric overflow while folding {target}")]
    Overflow { target: ValueType },

    #[error("cannot order {left} against {right}")]
    Incomparable { left: ValueKind, right: ValueKind },
}

impl ConversionError {
    fn unparseable(text: &str, target: ValueType) -> Self {
        Self::Unparseable {
            text: text.to_string(),
            target,
        }
    }

    const fn unsupported(value: &Value, target: ValueType) -> Self {
        Self::Unsupported {
            from: value.kind(),
            target,
        }
    }

    fn out_of_range(value: &Value, target: ValueType) -> Self {
        Self::OutOfRange {
            from: value.kind(),
            value: value.to_string(),
            target,
        }
    }
}

impl Value {
    /// Convert this value into `target`.
    ///
    /// A null source yields `Value::Null` when `nullable`, otherwise the
    /// target's zero value.
    pub fn convert(&self, target: ValueType, nullable: bool) -> Result<Self, ConversionError> {
        let converted = match target {
            ValueType::Bool => self.as_nullable_bool()?.map(Self::Bool),
            ValueType::Int64 => self.as_nullable_int64()?.map(Self::Int),
            ValueType::Float64 => self.as_nullable_float64()?.map(Self::Float64),
            ValueType::Decimal => self.as_nullable_decimal()?.map(Self::Decimal),
            ValueType::Text => self.as_nullable_text()?.map(Self::Text),
            ValueType::Timestamp => self.as_nullable_timestamp()?.map(Self::Timestamp),
            ValueType::Uuid => self.as_nullable_uuid()?.map(Self::Uuid),
            ValueType::Bytes => self.as_nullable_bytes()?.map(Self::Blob),
        };

        Ok(match converted {
            Some(value) => value,
            None if nullable => Self::Null,
            None => target.zero_value(),
        })
    }

    ///
    /// TEXT
    ///

    pub fn as_text(&self) -> Result<String, ConversionError> {
        Ok(self.as_nullable_text()?.unwrap_or_default())
    }

    pub fn as_nullable_text(&self) -> Result<Option<String>, ConversionError> {
        let text = match self {
            Self::Null => return Ok(None),
            Self::Text(v) => v.clone(),
            Self::Bool(_) | Self::Int(_) | Self::Float64(_) | Self::Decimal(_) | Self::Uuid(_) => {
                self.to_string()
            }
            Self::Timestamp(v) => v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Self::Blob(_) => return Err(ConversionError::unsupported(self, ValueType::Text)),
        };

        Ok(Some(text))
    }

    ///
    /// INT64
    ///

    pub fn as_int64(&self) -> Result<i64, ConversionError> {
        Ok(self.as_nullable_int64()?.unwrap_or(0))
    }

    pub fn as_nullable_int64(&self) -> Result<Option<i64>, ConversionError> {
        let target = ValueType::Int64;
        let value = match self {
            Self::Null => return Ok(None),
            Self::Int(v) => *v,
            Self::Bool(v) => i64::from(*v),
            Self::Float64(v) => v
                .trunc()
                .to_i64()
                .ok_or_else(|| ConversionError::out_of_range(self, target))?,
            Self::Decimal(v) => v
                .trunc()
                .to_i64()
                .ok_or_else(|| ConversionError::out_of_range(self, target))?,
            Self::Text(v) => i64::from_str(v.trim())
                .map_err(|_| ConversionError::unparseable(v, target))?,
            Self::Timestamp(_) | Self::Uuid(_) | Self::Blob(_) => {
                return Err(ConversionError::unsupported(self, target));
            }
        };

        Ok(Some(value))
    }

    ///
    /// FLOAT64
    ///

    pub fn as_float64(&self) -> Result<f64, ConversionError> {
        Ok(self.as_nullable_float64()?.unwrap_or(0.0))
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn as_nullable_float64(&self) -> Result<Option<f64>, ConversionError> {
        let target = ValueType::Float64;
        let value = match self {
            Self::Null => return Ok(None),
            Self::Float64(v) => *v,
            Self::Int(v) => *v as f64,
            Self::Bool(v) => f64::from(u8::from(*v)),
            Self::Decimal(v) => v
                .to_f64()
                .ok_or_else(|| ConversionError::out_of_range(self, target))?,
            Self::Text(v) => f64::from_str(v.trim())
                .map_err(|_| ConversionError::unparseable(v, target))?,
            Self::Timestamp(_) | Self::Uuid(_) | Self::Blob(_) => {
                return Err(ConversionError::unsupported(self, target));
            }
        };

        Ok(Some(value))
    }

    ///
    /// DECIMAL
    ///

    pub fn as_decimal(&self) -> Result<Decimal, ConversionError> {
        Ok(self.as_nullable_decimal()?.unwrap_or(Decimal::ZERO))
    }

    pub fn as_nullable_decimal(&self) -> Result<Option<Decimal>, ConversionError> {
        let target = ValueType::Decimal;
        let value = match self {
            Self::Null => return Ok(None),
            Self::Decimal(v) => *v,
            Self::Int(v) => Decimal::from(*v),
            Self::Bool(v) => {
                if *v {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }
            }
            Self::Float64(v) => {
                exact_decimal(*v).ok_or_else(|| ConversionError::out_of_range(self, target))?
            }
            Self::Text(v) => parse_decimal(v).ok_or_else(|| ConversionError::unparseable(v, target))?,
            Self::Timestamp(_) | Self::Uuid(_) | Self::Blob(_) => {
                return Err(ConversionError::unsupported(self, target));
            }
        };

        Ok(Some(value))
    }

    ///
    /// BOOL
    ///

    pub fn as_bool(&self) -> Result<bool, ConversionError> {
        Ok(self.as_nullable_bool()?.unwrap_or(false))
    }

    pub fn as_nullable_bool(&self) -> Result<Option<bool>, ConversionError> {
        let target = ValueType::Bool;
        let value = match self {
            Self::Null => return Ok(None),
            Self::Bool(v) => *v,
            Self::Int(v) => *v != 0,
            Self::Text(v) => parse_bool(v).ok_or_else(|| ConversionError::unparseable(v, target))?,
            Self::Float64(_)
            | Self::Decimal(_)
            | Self::Timestamp(_)
            | Self::Uuid(_)
            | Self::Blob(_) => return Err(ConversionError::unsupported(self, target)),
        };

        Ok(Some(value))
    }

    ///
    /// TIMESTAMP
    ///

    pub fn as_timestamp(&self) -> Result<DateTime<Utc>, ConversionError> {
        Ok(self
            .as_nullable_timestamp()?
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    }

    pub fn as_nullable_timestamp(&self) -> Result<Option<DateTime<Utc>>, ConversionError> {
        let target = ValueType::Timestamp;
        let value = match self {
            Self::Null => return Ok(None),
            Self::Timestamp(v) => *v,
            Self::Text(v) => {
                parse_timestamp(v).ok_or_else(|| ConversionError::unparseable(v, target))?
            }
            _ => return Err(ConversionError::unsupported(self, target)),
        };

        Ok(Some(value))
    }

    ///
    /// UUID
    ///

    pub fn as_uuid(&self) -> Result<Uuid, ConversionError> {
        Ok(self.as_nullable_uuid()?.unwrap_or_else(Uuid::nil))
    }

    pub fn as_nullable_uuid(&self) -> Result<Option<Uuid>, ConversionError> {
        let target = ValueType::Uuid;
        let value = match self {
            Self::Null => return Ok(None),
            Self::Uuid(v) => *v,
            Self::Text(v) => {
                Uuid::parse_str(v.trim()).map_err(|_| ConversionError::unparseable(v, target))?
            }
            Self::Blob(v) => {
                Uuid::from_slice(v).map_err(|_| ConversionError::out_of_range(self, target))?
            }
            _ => return Err(ConversionError::unsupported(self, target)),
        };

        Ok(Some(value))
    }

    ///
    /// BYTES
    ///

    pub fn as_bytes(&self) -> Result<Vec<u8>, ConversionError> {
        Ok(self.as_nullable_bytes()?.unwrap_or_default())
    }

    pub fn as_nullable_bytes(&self) -> Result<Option<Vec<u8>>, ConversionError> {
        let value = match self {
            Self::Null => return Ok(None),
            Self::Blob(v) => v.clone(),
            Self::Text(v) => v.as_bytes().to_vec(),
            Self::Uuid(v) => v.as_bytes().to_vec(),
            _ => return Err(ConversionError::unsupported(self, ValueType::Bytes)),
        };

        Ok(Some(value))
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();

    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Some(false)
    } else {
        None
    }
}

// Accepts RFC 3339, then naive date-times and bare dates interpreted as UTC.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
