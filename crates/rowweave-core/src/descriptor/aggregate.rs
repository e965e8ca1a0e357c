use crate::{
    descriptor::{Cast, FieldSelector},
    predicate::Predicate,
    value::ValueType,
};
use derive_more::Display;

///
/// AggregateKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum AggregateKind {
    #[display("sum")]
    Sum,
    #[display("avg")]
    Avg,
    #[display("count")]
    Count,
    #[display("min")]
    Min,
    #[display("max")]
    Max,
}

impl AggregateKind {
    /// Return whether this kind folds a sourced column.
    /// `Count` counts rows and never reads a column.
    #[must_use]
    pub const fn requires_source(self) -> bool {
        !matches!(self, Self::Count)
    }
}

///
/// AggregateSpec
///
/// One aggregate output of a descriptor level.
///
/// Sum/Avg/Min/Max skip rows where the filter is false or the sourced value
/// is null. Count counts every row reaching the group, filtered only by the
/// filter predicate.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateSpec {
    target: String,
    kind: AggregateKind,
    source: Option<FieldSelector>,
    filter: Option<Predicate>,
    output: Option<Cast>,
}

impl AggregateSpec {
    #[must_use]
    pub fn new(
        kind: AggregateKind,
        target: impl Into<String>,
        source: Option<FieldSelector>,
    ) -> Self {
        Self {
            target: target.into(),
            kind,
            source,
            filter: None,
            output: None,
        }
    }

    #[must_use]
    pub fn count(target: impl Into<String>) -> Self {
        Self::new(AggregateKind::Count, target, None)
    }

    #[must_use]
    pub fn sum(target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        Self::new(AggregateKind::Sum, target, Some(source.into()))
    }

    #[must_use]
    pub fn avg(target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        Self::new(AggregateKind::Avg, target, Some(source.into()))
    }

    #[must_use]
    pub fn min(target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        Self::new(AggregateKind::Min, target, Some(source.into()))
    }

    #[must_use]
    pub fn max(target: impl Into<String>, source: impl Into<FieldSelector>) -> Self {
        Self::new(AggregateKind::Max, target, Some(source.into()))
    }

    /// Only fold rows for which `predicate` holds.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Convert the finalized value to `ty`; an empty result becomes the zero value.
    #[must_use]
    pub const fn output(mut self, ty: ValueType) -> Self {
        self.output = Some(Cast::new(ty, false));
        self
    }

    /// Convert the finalized value to `ty`, keeping null results null.
    #[must_use]
    pub const fn nullable_output(mut self, ty: ValueType) -> Self {
        self.output = Some(Cast::new(ty, true));
        self
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub const fn source(&self) -> Option<&FieldSelector> {
        self.source.as_ref()
    }

    #[must_use]
    pub const fn filter_predicate(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    #[must_use]
    pub const fn output_cast(&self) -> Option<Cast> {
        self.output
    }
}
