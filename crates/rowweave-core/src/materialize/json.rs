use crate::{
    materialize::{MaterializeError, MaterializedGroup, MaterializedValue, Materializer},
    value::Value,
};
use chrono::SecondsFormat;
use num_traits::ToPrimitive;
use serde_json::{Map, Number, Value as JsonValue};

///
/// DecimalMode
///
/// How decimals render into JSON.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DecimalMode {
    /// Integral decimals that fit `i64` become JSON integers, the rest
    /// become JSON floats.
    #[default]
    Number,

    /// Canonical decimal text; lossless.
    String,
}

///
/// JsonMaterializer
///
/// Renders groups as JSON objects with keys in declared layout order.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonMaterializer {
    decimals: DecimalMode,
}

impl JsonMaterializer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            decimals: DecimalMode::Number,
        }
    }

    #[must_use]
    pub const fn with_decimals(mut self, decimals: DecimalMode) -> Self {
        self.decimals = decimals;
        self
    }

    #[must_use]
    pub fn to_json(&self, group: &MaterializedGroup) -> JsonValue {
        let mut object = Map::with_capacity(group.entries().len());
        for (name, value) in group.entries() {
            let json = match value {
                MaterializedValue::Scalar(value) => value_to_json(value, self.decimals),
                MaterializedValue::Collection(groups) => {
                    JsonValue::Array(groups.iter().map(|child| self.to_json(child)).collect())
                }
            };
            object.insert(name.clone(), json);
        }

        JsonValue::Object(object)
    }
}

impl Materializer for JsonMaterializer {
    type Output = JsonValue;

    fn materialize(&self, group: &MaterializedGroup) -> Result<Self::Output, MaterializeError> {
        Ok(self.to_json(group))
    }
}

/// Render one scalar value as JSON.
///
/// Non-finite floats become null. Timestamps render as RFC 3339, UUIDs
/// hyphenated and blobs as byte arrays.
#[must_use]
pub fn value_to_json(value: &Value, decimals: DecimalMode) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::Float64(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Decimal(v) => match decimals {
            DecimalMode::String => JsonValue::String(v.to_string()),
            DecimalMode::Number => {
                let normalized = v.normalize();
                if normalized.scale() == 0
                    && let Some(int) = normalized.to_i64()
                {
                    return JsonValue::from(int);
                }

                normalized
                    .to_f64()
                    .and_then(Number::from_f64)
                    .map_or_else(|| JsonValue::String(v.to_string()), JsonValue::Number)
            }
        },
        Value::Text(v) => JsonValue::String(v.clone()),
        Value::Timestamp(v) => JsonValue::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::Uuid(v) => JsonValue::String(v.hyphenated().to_string()),
        Value::Blob(v) => JsonValue::Array(v.iter().map(|byte| JsonValue::from(*byte)).collect()),
    }
}
