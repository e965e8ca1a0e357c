use crate::descriptor::{
    AggregateSpec, DescriptorError, FieldMapping, FieldSelector, KeyComponent, KeySpec,
    LayoutSlot, MappingDescriptor, NestedMapping,
};

///
/// DescriptorBuilder
///
/// Fluent construction of one `MappingDescriptor`. Output entries are laid
/// out in call order; `build` validates the finished descriptor.
///
/// One `key` call yields a simple key, several calls a composite key.
///

#[derive(Clone, Debug)]
pub struct DescriptorBuilder {
    shape_id: String,
    key: Vec<KeyComponent>,
    skip_null: bool,
    fields: Vec<FieldMapping>,
    aggregates: Vec<AggregateSpec>,
    nested: Vec<NestedMapping>,
    layout: Vec<LayoutSlot>,
}

impl DescriptorBuilder {
    #[must_use]
    pub fn new(shape_id: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            key: Vec::new(),
            skip_null: false,
            fields: Vec::new(),
            aggregates: Vec::new(),
            nested: Vec::new(),
            layout: Vec::new(),
        }
    }

    /// Append one key component.
    #[must_use]
    pub fn key(mut self, component: impl Into<KeyComponent>) -> Self {
        let component = component.into();
        if component.target().is_some() {
            self.layout.push(LayoutSlot::Key(self.key.len()));
        }
        self.key.push(component);
        self
    }

    /// Drop rows whose key has any null component.
    #[must_use]
    pub const fn skip_null(mut self, skip_null: bool) -> Self {
        self.skip_null = skip_null;
        self
    }

    #[must_use]
    pub fn field(mut self, target: impl Into<String>, selector: impl Into<FieldSelector>) -> Self {
        self.layout.push(LayoutSlot::Field(self.fields.len()));
        self.fields.push(FieldMapping::new(target, selector));
        self
    }

    #[must_use]
    pub fn aggregate(mut self, spec: AggregateSpec) -> Self {
        self.layout.push(LayoutSlot::Aggregate(self.aggregates.len()));
        self.aggregates.push(spec);
        self
    }

    #[must_use]
    pub fn count(self, target: impl Into<String>) -> Self {
        self.aggregate(AggregateSpec::count(target))
    }

    #[must_use]
    pub fn sum(self, target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        self.aggregate(AggregateSpec::sum(target, source))
    }

    #[must_use]
    pub fn avg(self, target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        self.aggregate(AggregateSpec::avg(target, source))
    }

    #[must_use]
    pub fn min(self, target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        self.aggregate(AggregateSpec::min(target, source))
    }

    #[must_use]
    pub fn max(self, target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        self.aggregate(AggregateSpec::max(target, source))
    }

    #[must_use]
    pub fn nested(mut self, target: impl Into<String>, descriptor: MappingDescriptor) -> Self {
        self.layout.push(LayoutSlot::Nested(self.nested.len()));
        self.nested.push(NestedMapping::new(target, descriptor));
        self
    }

    /// Finish and validate the descriptor.
    pub fn build(self) -> Result<MappingDescriptor, DescriptorError> {
        let descriptor = self.build_unchecked();
        descriptor.validate()?;

        Ok(descriptor)
    }

    /// Finish without validating; the engine still validates before ingesting.
    #[must_use]
    pub fn build_unchecked(self) -> MappingDescriptor {
        let mut components = self.key;
        let key = if components.len() == 1 {
            KeySpec::simple(components.remove(0))
        } else {
            KeySpec::composite(components)
        }
        .skip_null(self.skip_null);

        MappingDescriptor::from_layout(
            self.shape_id,
            key,
            self.fields,
            self.aggregates,
            self.nested,
            self.layout,
        )
    }
}
