use crate::{
    row::FieldSource,
    value::{ConversionError, Value, ValueType},
};
use std::fmt;

///
/// Cast
///
/// Requested conversion applied after reading a column.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Cast {
    pub ty: ValueType,
    pub nullable: bool,
}

impl Cast {
    #[must_use]
    pub const fn new(ty: ValueType, nullable: bool) -> Self {
        Self { ty, nullable }
    }

    pub fn apply(self, value: &Value) -> Result<Value, ConversionError> {
        value.convert(self.ty, self.nullable)
    }
}

impl fmt::Display for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}

///
/// FieldSelector
///
/// Reads one column from a row, optionally converting it.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldSelector {
    column: String,
    cast: Option<Cast>,
}

impl FieldSelector {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            cast: None,
        }
    }

    /// Convert the column to `ty`; null becomes the zero value.
    #[must_use]
    pub const fn cast(mut self, ty: ValueType) -> Self {
        self.cast = Some(Cast::new(ty, false));
        self
    }

    /// Convert the column to `ty`; null stays null.
    #[must_use]
    pub const fn nullable(mut self, ty: ValueType) -> Self {
        self.cast = Some(Cast::new(ty, true));
        self
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub const fn cast_spec(&self) -> Option<Cast> {
        self.cast
    }

    /// Read the column from `row` and apply the cast, if any.
    pub fn resolve<R: FieldSource + ?Sized>(&self, row: &R) -> Result<Value, ConversionError> {
        let raw = row.field(&self.column);

        match self.cast {
            Some(cast) => cast.apply(raw),
            None => Ok(raw.clone()),
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cast {
            Some(cast) => write!(f, "{} as {cast}", self.column),
            None => f.write_str(&self.column),
        }
    }
}

impl From<&str> for FieldSelector {
    fn from(column: &str) -> Self {
        Self::new(column)
    }
}

impl From<String> for FieldSelector {
    fn from(column: String) -> Self {
        Self::new(column)
    }
}
