//! Module: descriptor
//! Responsibility: the declarative mapping IR (keys, fields, aggregates, nested shapes).
//! Does not own: evaluation; the engine interprets descriptors, it never mutates them.
//! Boundary: descriptors are authored by explicit construction and validated
//! before any row is read.

mod aggregate;
mod builder;
mod key;
mod selector;
mod validate;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateKind, AggregateSpec};
pub use builder::DescriptorBuilder;
pub use key::{KeyComponent, KeyShape, KeySpec};
pub use selector::{Cast, FieldSelector};
pub use validate::DescriptorError;

///
/// FieldMapping
///
/// Scalar output copied from the first row that reaches a group.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMapping {
    target: String,
    selector: FieldSelector,
}

impl FieldMapping {
    #[must_use]
    pub fn new(target: impl Into<String>, selector: impl Into<FieldSelector>) -> Self {
        Self {
            target: target.into(),
            selector: selector.into(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn selector(&self) -> &FieldSelector {
        &self.selector
    }
}

///
/// NestedMapping
///
/// Child collection: every row reaching a parent group is re-grouped by the
/// child descriptor.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NestedMapping {
    target: String,
    descriptor: MappingDescriptor,
}

impl NestedMapping {
    #[must_use]
    pub fn new(target: impl Into<String>, descriptor: MappingDescriptor) -> Self {
        Self {
            target: target.into(),
            descriptor,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn descriptor(&self) -> &MappingDescriptor {
        &self.descriptor
    }
}

///
/// LayoutSlot
///
/// One declared output entry, indexing into the owning descriptor's lists.
/// `Key` indexes key components and only appears for projected components.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LayoutSlot {
    Key(usize),
    Field(usize),
    Aggregate(usize),
    Nested(usize),
}

///
/// MappingDescriptor
///
/// Declarative spec mapping rows onto one output shape, including nested
/// shapes. `layout` preserves declaration order for materialization.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MappingDescriptor {
    shape_id: String,
    key: KeySpec,
    fields: Vec<FieldMapping>,
    aggregates: Vec<AggregateSpec>,
    nested: Vec<NestedMapping>,
    layout: Vec<LayoutSlot>,
}

impl MappingDescriptor {
    #[must_use]
    pub fn builder(shape_id: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(shape_id)
    }

    /// Assemble a descriptor from parts with the default layout:
    /// projected keys, then fields, aggregates and nested collections.
    #[must_use]
    pub fn from_parts(
        shape_id: impl Into<String>,
        key: KeySpec,
        fields: Vec<FieldMapping>,
        aggregates: Vec<AggregateSpec>,
        nested: Vec<NestedMapping>,
    ) -> Self {
        let key_slots = key
            .components()
            .iter()
            .enumerate()
            .filter(|(_, component)| component.target().is_some())
            .map(|(index, _)| LayoutSlot::Key(index));
        let layout = key_slots
            .chain((0..fields.len()).map(LayoutSlot::Field))
            .chain((0..aggregates.len()).map(LayoutSlot::Aggregate))
            .chain((0..nested.len()).map(LayoutSlot::Nested))
            .collect();

        Self {
            shape_id: shape_id.into(),
            key,
            fields,
            aggregates,
            nested,
            layout,
        }
    }

    pub(crate) fn from_layout(
        shape_id: String,
        key: KeySpec,
        fields: Vec<FieldMapping>,
        aggregates: Vec<AggregateSpec>,
        nested: Vec<NestedMapping>,
        layout: Vec<LayoutSlot>,
    ) -> Self {
        Self {
            shape_id,
            key,
            fields,
            aggregates,
            nested,
            layout,
        }
    }

    #[must_use]
    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    #[must_use]
    pub const fn key(&self) -> &KeySpec {
        &self.key
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    #[must_use]
    pub fn aggregates(&self) -> &[AggregateSpec] {
        &self.aggregates
    }

    #[must_use]
    pub fn nested(&self) -> &[NestedMapping] {
        &self.nested
    }

    #[must_use]
    pub fn layout(&self) -> &[LayoutSlot] {
        &self.layout
    }

    /// Target name of one layout slot, if the slot resolves.
    #[must_use]
    pub fn slot_target(&self, slot: LayoutSlot) -> Option<&str> {
        match slot {
            LayoutSlot::Key(index) => self.key.components().get(index)?.target(),
            LayoutSlot::Field(index) => self.fields.get(index).map(FieldMapping::target),
            LayoutSlot::Aggregate(index) => self.aggregates.get(index).map(AggregateSpec::target),
            LayoutSlot::Nested(index) => self.nested.get(index).map(NestedMapping::target),
        }
    }

    /// Output entry names in declared order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.layout
            .iter()
            .filter_map(|slot| self.slot_target(*slot))
    }

    /// Nesting depth below this descriptor (0 for a flat shape).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nested
            .iter()
            .map(|nested| nested.descriptor.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Check the structural invariants of this descriptor and every nested one.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        validate::validate_descriptor(self)
    }
}
