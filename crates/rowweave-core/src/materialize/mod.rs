//! Module: materialize
//! Responsibility: finalized group trees and their conversion into caller output types.
//! Does not own: grouping or aggregation; groups arrive here already final.
//! Boundary: pure recursive conversion, no I/O.

mod deserialize;
mod json;
mod view;

#[cfg(test)]
mod tests;

use crate::value::{ConversionError, Value};
use thiserror::Error as ThisError;

pub use deserialize::SerdeMaterializer;
pub use json::{DecimalMode, JsonMaterializer, value_to_json};
pub use view::{FromGroup, FromGroupMaterializer, GroupView};

///
/// MaterializedValue
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MaterializedValue {
    Scalar(Value),
    Collection(Vec<MaterializedGroup>),
}

impl MaterializedValue {
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Collection(_) => None,
        }
    }

    #[must_use]
    pub fn as_collection(&self) -> Option<&[MaterializedGroup]> {
        match self {
            Self::Scalar(_) => None,
            Self::Collection(groups) => Some(groups),
        }
    }
}

///
/// MaterializedGroup
///
/// One finalized group: its key tuple plus output entries in declared
/// layout order. Immutable once produced.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaterializedGroup {
    shape_id: String,
    key: Vec<Value>,
    entries: Vec<(String, MaterializedValue)>,
}

impl MaterializedGroup {
    #[must_use]
    pub fn new(
        shape_id: impl Into<String>,
        key: Vec<Value>,
        entries: Vec<(String, MaterializedValue)>,
    ) -> Self {
        Self {
            shape_id: shape_id.into(),
            key,
            entries,
        }
    }

    #[must_use]
    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    /// Key tuple in key component order, projected or not.
    #[must_use]
    pub fn key(&self) -> &[Value] {
        &self.key
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, MaterializedValue)] {
        &self.entries
    }

    /// Look up one entry by target name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MaterializedValue> {
        self.entries
            .iter()
            .find(|(target, _)| target == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.get(name)?.as_scalar()
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&[MaterializedGroup]> {
        self.get(name)?.as_collection()
    }
}

///
/// MaterializeError
///

#[derive(Debug, ThisError)]
pub enum MaterializeError {
    #[error("entry '{field}' is missing")]
    MissingEntry { field: String },

    #[error("entry '{field}' is not a scalar")]
    ExpectedScalar { field: String },

    #[error("entry '{field}' is not a collection")]
    ExpectedCollection { field: String },

    #[error("entry '{field}': {source}")]
    Conversion {
        field: String,
        source: ConversionError,
    },

    #[error("cannot deserialize '{shape_id}': {source}")]
    Deserialize {
        shape_id: String,
        source: serde_json::Error,
    },

    #[error("{message}")]
    Custom { message: String },
}

impl MaterializeError {
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Offending entry name, when one is known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingEntry { field }
            | Self::ExpectedScalar { field }
            | Self::ExpectedCollection { field }
            | Self::Conversion { field, .. } => Some(field),
            Self::Deserialize { .. } | Self::Custom { .. } => None,
        }
    }
}

///
/// Materializer
///
/// Converts finalized groups into one caller output representation.
///

pub trait Materializer {
    type Output;

    fn materialize(&self, group: &MaterializedGroup) -> Result<Self::Output, MaterializeError>;

    /// Materialize a result list, preserving group order.
    fn materialize_all(
        &self,
        groups: &[MaterializedGroup],
    ) -> Result<Vec<Self::Output>, MaterializeError> {
        groups.iter().map(|group| self.materialize(group)).collect()
    }
}
