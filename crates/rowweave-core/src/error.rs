use crate::{descriptor::DescriptorError, materialize::MaterializeError, value::ConversionError};
use std::fmt::{self, Write as _};
use thiserror::Error as ThisError;

///
/// WeaveError
///
/// Structured failure of one ingest or materialization call.
///
/// Every failure is fatal to the enclosing call: nested failures abort the
/// parent and no partial result list is ever returned.
///

#[derive(Debug, ThisError)]
#[error("{kind} in shape '{shape_id}'{}: {message}", self.location())]
pub struct WeaveError {
    pub kind: ErrorKind,

    /// Shape id of the descriptor whose evaluation failed.
    pub shape_id: String,

    /// Target field (or key component column) that failed, when known.
    pub field: Option<String>,

    /// Nested target fields walked from the root descriptor down to the
    /// failing one. Empty at the root.
    pub path: Vec<String>,

    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `kind`.
    pub detail: Option<ErrorDetail>,
}

impl WeaveError {
    pub fn new(kind: ErrorKind, shape_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            shape_id: shape_id.into(),
            field: None,
            path: Vec::new(),
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a conversion failure for one target field.
    pub fn conversion(
        shape_id: impl Into<String>,
        field: impl Into<String>,
        err: ConversionError,
    ) -> Self {
        Self {
            field: Some(field.into()),
            detail: Some(ErrorDetail::Conversion(err.clone())),
            ..Self::new(ErrorKind::Conversion, shape_id, err.to_string())
        }
    }

    /// Construct a strict-key failure for one null key component.
    pub fn missing_key_component(shape_id: impl Into<String>, column: impl Into<String>) -> Self {
        let column = column.into();

        Self {
            message: format!("key component '{column}' is null"),
            field: Some(column),
            ..Self::new(ErrorKind::MissingKeyComponent, shape_id, String::new())
        }
    }

    /// Construct a descriptor validation failure, locating the innermost
    /// failing descriptor below `root_shape`.
    pub fn descriptor(root_shape: &str, err: DescriptorError) -> Self {
        let (path, shape_id) = err.location(root_shape);
        let shape_id = shape_id.to_string();

        Self {
            field: err.field().map(ToString::to_string),
            path,
            message: err.leaf().to_string(),
            detail: Some(ErrorDetail::Descriptor(err)),
            ..Self::new(ErrorKind::DescriptorValidation, shape_id, String::new())
        }
    }

    /// Construct a hard-limit failure.
    pub fn resource_limit(shape_id: impl Into<String>, limit: ResourceLimit, max: usize) -> Self {
        Self {
            detail: Some(ErrorDetail::ResourceLimit { limit, max }),
            ..Self::new(
                ErrorKind::ResourceLimitExceeded,
                shape_id,
                format!("{limit} limit of {max} exceeded"),
            )
        }
    }

    /// Construct a materialization failure.
    pub fn materialization(shape_id: impl Into<String>, err: MaterializeError) -> Self {
        Self {
            field: err.field().map(ToString::to_string),
            message: err.to_string(),
            detail: Some(ErrorDetail::Materialize(err)),
            ..Self::new(ErrorKind::Materialization, shape_id, String::new())
        }
    }

    /// Prefix the nested path with the target field of an enclosing mapping.
    #[must_use]
    pub(crate) fn nested_under(mut self, target: &str) -> Self {
        self.path.insert(0, target.to_string());
        self
    }

    #[must_use]
    pub const fn conversion_error(&self) -> Option<&ConversionError> {
        match &self.detail {
            Some(ErrorDetail::Conversion(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn descriptor_error(&self) -> Option<&DescriptorError> {
        match &self.detail {
            Some(ErrorDetail::Descriptor(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }

    fn location(&self) -> String {
        let mut out = String::new();
        if !self.path.is_empty() {
            out.push_str(" at ");
            out.push_str(&self.path.join("."));
        }
        if let Some(field) = &self.field {
            let _ = write!(out, " (field '{field}')");
        }

        out
    }
}

///
/// ErrorDetail
///
/// Structured, kind-specific error detail carried by [`WeaveError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Conversion(ConversionError),

    #[error("{0}")]
    Descriptor(DescriptorError),

    #[error("{limit} limit of {max} exceeded")]
    ResourceLimit { limit: ResourceLimit, max: usize },

    #[error("{0}")]
    Materialize(MaterializeError),
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    Conversion,
    MissingKeyComponent,
    DescriptorValidation,
    ResourceLimitExceeded,
    Materialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conversion => "conversion",
            Self::MissingKeyComponent => "missing_key_component",
            Self::DescriptorValidation => "descriptor_validation",
            Self::ResourceLimitExceeded => "resource_limit_exceeded",
            Self::Materialization => "materialization",
        };
        write!(f, "{label}")
    }
}

///
/// ResourceLimit
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ResourceLimit {
    Groups,
    BufferedRows,
}

impl fmt::Display for ResourceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Groups => "group",
            Self::BufferedRows => "buffered row",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    #[test]
    fn conversion_error_names_shape_path_and_field() {
        let err = WeaveError::conversion(
            "Order",
            "total",
            ConversionError::Unparseable {
                text: "n/a".to_string(),
                target: ValueType::Decimal,
            },
        )
        .nested_under("lines")
        .nested_under("orders");

        assert_eq!(err.kind, ErrorKind::Conversion);
        assert_eq!(err.path, vec!["orders".to_string(), "lines".to_string()]);
        assert_eq!(
            err.to_string(),
            "conversion in shape 'Order' at orders.lines (field 'total'): cannot parse text 'n/a' as decimal"
        );
        assert!(err.conversion_error().is_some());
    }

    #[test]
    fn resource_limit_message_names_the_limit() {
        let err = WeaveError::resource_limit("Vehicle", ResourceLimit::Groups, 10);

        assert_eq!(err.kind, ErrorKind::ResourceLimitExceeded);
        assert_eq!(
            err.display_with_kind(),
            "resource_limit_exceeded: group limit of 10 exceeded"
        );
    }

    #[test]
    fn missing_key_component_records_the_column() {
        let err = WeaveError::missing_key_component("Vehicle", "make");

        assert_eq!(err.field.as_deref(), Some("make"));
        assert!(err.detail.is_none());
    }
}
