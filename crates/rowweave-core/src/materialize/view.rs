use crate::{
    materialize::{MaterializeError, MaterializedGroup, MaterializedValue, Materializer},
    value::{ConversionError, Value},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::marker::PhantomData;
use uuid::Uuid;

///
/// FromGroup
///
/// Hand-written conversion from one finalized group, for callers that do
/// not want to route through serde.
///

pub trait FromGroup: Sized {
    fn from_group(group: &GroupView<'_>) -> Result<Self, MaterializeError>;
}

///
/// GroupView
///
/// Typed read access to the entries of one `MaterializedGroup`.
/// Every accessor applies the value conversion policy of `Value`.
///

#[derive(Clone, Copy, Debug)]
pub struct GroupView<'a> {
    group: &'a MaterializedGroup,
}

macro_rules! typed_accessors {
    ($($name:ident, $nullable:ident, $as:ident, $as_nullable:ident => $ty:ty;)*) => {
        $(
            pub fn $name(&self, name: &str) -> Result<$ty, MaterializeError> {
                self.convert(name, Value::$as)
            }

            pub fn $nullable(&self, name: &str) -> Result<Option<$ty>, MaterializeError> {
                self.convert(name, Value::$as_nullable)
            }
        )*
    };
}

impl<'a> GroupView<'a> {
    #[must_use]
    pub const fn new(group: &'a MaterializedGroup) -> Self {
        Self { group }
    }

    #[must_use]
    pub fn shape_id(&self) -> &'a str {
        self.group.shape_id()
    }

    #[must_use]
    pub fn key(&self) -> &'a [Value] {
        self.group.key()
    }

    /// Raw scalar value of one entry.
    pub fn value(&self, name: &str) -> Result<&'a Value, MaterializeError> {
        match self.entry(name)? {
            MaterializedValue::Scalar(value) => Ok(value),
            MaterializedValue::Collection(_) => Err(MaterializeError::ExpectedScalar {
                field: name.to_string(),
            }),
        }
    }

    typed_accessors! {
        text, nullable_text, as_text, as_nullable_text => String;
        i64, nullable_i64, as_int64, as_nullable_int64 => i64;
        f64, nullable_f64, as_float64, as_nullable_float64 => f64;
        decimal, nullable_decimal, as_decimal, as_nullable_decimal => Decimal;
        bool, nullable_bool, as_bool, as_nullable_bool => bool;
        timestamp, nullable_timestamp, as_timestamp, as_nullable_timestamp => DateTime<Utc>;
        uuid, nullable_uuid, as_uuid, as_nullable_uuid => Uuid;
        bytes, nullable_bytes, as_bytes, as_nullable_bytes => Vec<u8>;
    }

    /// Child groups of one nested collection.
    pub fn groups(&self, name: &str) -> Result<&'a [MaterializedGroup], MaterializeError> {
        match self.entry(name)? {
            MaterializedValue::Collection(groups) => Ok(groups),
            MaterializedValue::Scalar(_) => Err(MaterializeError::ExpectedCollection {
                field: name.to_string(),
            }),
        }
    }

    /// Convert one nested collection into `T`, preserving child order.
    pub fn nested<T: FromGroup>(&self, name: &str) -> Result<Vec<T>, MaterializeError> {
        self.groups(name)?
            .iter()
            .map(|child| T::from_group(&GroupView::new(child)))
            .collect()
    }

    fn entry(&self, name: &str) -> Result<&'a MaterializedValue, MaterializeError> {
        self.group
            .get(name)
            .ok_or_else(|| MaterializeError::MissingEntry {
                field: name.to_string(),
            })
    }

    fn convert<T>(
        &self,
        name: &str,
        f: impl FnOnce(&Value) -> Result<T, ConversionError>,
    ) -> Result<T, MaterializeError> {
        f(self.value(name)?).map_err(|source| MaterializeError::Conversion {
            field: name.to_string(),
            source,
        })
    }
}

///
/// FromGroupMaterializer
///

#[derive(Debug)]
pub struct FromGroupMaterializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromGroupMaterializer<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromGroupMaterializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromGroup> Materializer for FromGroupMaterializer<T> {
    type Output = T;

    fn materialize(&self, group: &MaterializedGroup) -> Result<T, MaterializeError> {
        T::from_group(&GroupView::new(group))
    }
}
