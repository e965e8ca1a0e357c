//! Structural validation of mapping descriptors.
//!
//! Runs before any row is read, both from `DescriptorBuilder::build` and
//! again at the engine boundary, so hand-assembled descriptors are held to
//! the same rules.

use crate::descriptor::{KeyShape, LayoutSlot, MappingDescriptor};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

///
/// DescriptorError
///
/// Malformed mapping IR. Nested failures are wrapped once per level so the
/// path from the root is recoverable.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DescriptorError {
    #[error("descriptor shape id is empty")]
    EmptyShapeId,

    #[error("grouping key has no components")]
    EmptyKey,

    #[error("composite key needs at least two components, found {found}")]
    CompositeKeyTooShort { found: usize },

    #[error("output entry has an empty target name")]
    EmptyTarget,

    #[error("selector for '{field}' names an empty column")]
    EmptyColumn { field: String },

    #[error("output entry '{field}' is declared more than once")]
    DuplicateTarget { field: String },

    #[error("{kind} aggregate '{field}' has no source selector")]
    MissingAggregateSource { field: String, kind: String },

    #[error("count aggregate '{field}' cannot take a source selector")]
    CountWithSource { field: String },

    #[error("layout slot {slot:?} does not resolve")]
    DanglingLayoutSlot { slot: LayoutSlot },

    #[error("nested '{target}' ({shape_id}): {source}")]
    Nested {
        target: String,
        shape_id: String,
        source: Box<Self>,
    },
}

impl DescriptorError {
    /// Innermost error, past every `Nested` wrapper.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match self {
            Self::Nested { source, .. } => source.leaf(),
            other => other,
        }
    }

    /// Offending target field of the innermost error, when one exists.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self.leaf() {
            Self::EmptyColumn { field }
            | Self::DuplicateTarget { field }
            | Self::MissingAggregateSource { field, .. }
            | Self::CountWithSource { field } => Some(field),
            _ => None,
        }
    }

    /// Nested targets walked from the root to the innermost error, plus the
    /// shape id of the descriptor that failed.
    #[must_use]
    pub fn location<'a>(&'a self, root_shape: &'a str) -> (Vec<String>, &'a str) {
        let mut path = Vec::new();
        let mut shape = root_shape;
        let mut current = self;

        while let Self::Nested {
            target,
            shape_id,
            source,
        } = current
        {
            path.push(target.clone());
            shape = shape_id;
            current = source;
        }

        (path, shape)
    }
}

pub(crate) fn validate_descriptor(descriptor: &MappingDescriptor) -> Result<(), DescriptorError> {
    if descriptor.shape_id().trim().is_empty() {
        return Err(DescriptorError::EmptyShapeId);
    }

    validate_key(descriptor)?;
    validate_selectors(descriptor)?;
    validate_aggregates(descriptor)?;
    validate_layout(descriptor)?;

    for nested in descriptor.nested() {
        validate_descriptor(nested.descriptor()).map_err(|err| DescriptorError::Nested {
            target: nested.target().to_string(),
            shape_id: nested.descriptor().shape_id().to_string(),
            source: Box::new(err),
        })?;
    }

    Ok(())
}

fn validate_key(descriptor: &MappingDescriptor) -> Result<(), DescriptorError> {
    match descriptor.key().shape() {
        KeyShape::Simple(_) => Ok(()),
        KeyShape::Composite(components) if components.is_empty() => Err(DescriptorError::EmptyKey),
        KeyShape::Composite(components) if components.len() < 2 => {
            Err(DescriptorError::CompositeKeyTooShort {
                found: components.len(),
            })
        }
        KeyShape::Composite(_) => Ok(()),
    }
}

fn validate_selectors(descriptor: &MappingDescriptor) -> Result<(), DescriptorError> {
    let key_selectors = descriptor.key().components().iter().map(|component| {
        (
            component.target().unwrap_or_else(|| component.selector().column()),
            component.selector(),
        )
    });
    let field_selectors = descriptor
        .fields()
        .iter()
        .map(|field| (field.target(), field.selector()));
    let aggregate_selectors = descriptor
        .aggregates()
        .iter()
        .filter_map(|agg| agg.source().map(|source| (agg.target(), source)));

    for (field, selector) in key_selectors
        .chain(field_selectors)
        .chain(aggregate_selectors)
    {
        if selector.column().trim().is_empty() {
            return Err(DescriptorError::EmptyColumn {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

fn validate_aggregates(descriptor: &MappingDescriptor) -> Result<(), DescriptorError> {
    for agg in descriptor.aggregates() {
        match (agg.kind().requires_source(), agg.source()) {
            (true, None) => {
                return Err(DescriptorError::MissingAggregateSource {
                    field: agg.target().to_string(),
                    kind: agg.kind().to_string(),
                });
            }
            (false, Some(_)) => {
                return Err(DescriptorError::CountWithSource {
                    field: agg.target().to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

fn validate_layout(descriptor: &MappingDescriptor) -> Result<(), DescriptorError> {
    let mut seen = BTreeSet::new();

    for slot in descriptor.layout() {
        let Some(target) = descriptor.slot_target(*slot) else {
            return Err(DescriptorError::DanglingLayoutSlot { slot: *slot });
        };
        if target.trim().is_empty() {
            return Err(DescriptorError::EmptyTarget);
        }
        if !seen.insert(target) {
            return Err(DescriptorError::DuplicateTarget {
                field: target.to_string(),
            });
        }
    }

    Ok(())
}
