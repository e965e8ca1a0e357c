use crate::descriptor::FieldSelector;
use std::slice;

///
/// KeyComponent
///
/// One column of a grouping key, optionally projected into the output under
/// `target`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyComponent {
    selector: FieldSelector,
    target: Option<String>,
}

impl KeyComponent {
    /// Key component that groups on `selector` without being emitted.
    #[must_use]
    pub fn hidden(selector: impl Into<FieldSelector>) -> Self {
        Self {
            selector: selector.into(),
            target: None,
        }
    }

    /// Key component emitted under `target`.
    #[must_use]
    pub fn projected(target: impl Into<String>, selector: impl Into<FieldSelector>) -> Self {
        Self {
            selector: selector.into(),
            target: Some(target.into()),
        }
    }

    #[must_use]
    pub const fn selector(&self) -> &FieldSelector {
        &self.selector
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

/// A bare column name groups on that column and emits it under the same name.
impl From<&str> for KeyComponent {
    fn from(column: &str) -> Self {
        Self::projected(column, column)
    }
}

impl From<FieldSelector> for KeyComponent {
    fn from(selector: FieldSelector) -> Self {
        Self {
            target: Some(selector.column().to_string()),
            selector,
        }
    }
}

///
/// KeyShape
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyShape {
    Simple(KeyComponent),
    Composite(Vec<KeyComponent>),
}

///
/// KeySpec
///
/// Grouping key of one descriptor level.
///
/// Composite keys compare pointwise as ordered tuples. With `skip_null` a
/// row whose key has any null component is dropped from this level and
/// everything nested beneath it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySpec {
    shape: KeyShape,
    skip_null: bool,
}

impl KeySpec {
    #[must_use]
    pub fn simple(component: impl Into<KeyComponent>) -> Self {
        Self {
            shape: KeyShape::Simple(component.into()),
            skip_null: false,
        }
    }

    #[must_use]
    pub fn composite<I, C>(components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<KeyComponent>,
    {
        Self {
            shape: KeyShape::Composite(components.into_iter().map(Into::into).collect()),
            skip_null: false,
        }
    }

    #[must_use]
    pub const fn skip_null(mut self, skip_null: bool) -> Self {
        self.skip_null = skip_null;
        self
    }

    #[must_use]
    pub const fn skips_null(&self) -> bool {
        self.skip_null
    }

    #[must_use]
    pub const fn shape(&self) -> &KeyShape {
        &self.shape
    }

    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self.shape, KeyShape::Composite(_))
    }

    /// Key components in tuple order.
    #[must_use]
    pub fn components(&self) -> &[KeyComponent] {
        match &self.shape {
            KeyShape::Simple(component) => slice::from_ref(component),
            KeyShape::Composite(components) => components,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.components().len()
    }
}
