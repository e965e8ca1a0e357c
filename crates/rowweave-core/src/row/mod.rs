//! Module: row
//! Responsibility: one source record exposed as ordered, case-insensitive named fields.
//! Does not own: naming-convention translation (see `naming`) or type conversion.

#[cfg(test)]
mod tests;

use crate::{naming::NamingConvention, value::Value};
use std::collections::HashMap;

static NULL_VALUE: Value = Value::Null;

///
/// Row
///
/// Ordered mapping from field name to value.
///
/// - lookups are case-insensitive
/// - a missing field resolves to `Value::Null`, never an error
/// - duplicate names keep the first position and the last value
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append one field and return the row.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name.into(), value.into());
        self
    }

    /// Build one row from a JSON object.
    #[must_use]
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        object
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value)))
            .collect()
    }

    fn insert(&mut self, name: String, value: Value) {
        let folded = fold_name(&name);
        if let Some(&slot) = self.index.get(&folded) {
            self.fields[slot].1 = value;
            return;
        }

        self.index.insert(folded, self.fields.len());
        self.fields.push((name, value));
    }

    /// Borrow the value of one field, or null when the field is missing.
    #[must_use]
    pub fn get(&self, name: &str) -> &Value {
        self.try_get(name).unwrap_or(&NULL_VALUE)
    }

    /// Borrow the value of one field when present.
    #[must_use]
    pub fn try_get(&self, name: &str) -> Option<&Value> {
        self.index
            .get(&fold_name(name))
            .map(|&slot| &self.fields[slot].1)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&fold_name(name))
    }

    /// Field names in first-insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut row = Self::with_capacity(iter.size_hint().0);
        for (name, value) in iter {
            row.insert(name.into(), value.into());
        }

        row
    }
}

fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

///
/// FieldSource
///
/// Abstraction over a row-like value that can resolve a column by name.
/// Decouples selector and predicate evaluation from naming policy.
///

pub trait FieldSource {
    fn field(&self, column: &str) -> &Value;
}

impl FieldSource for Row {
    fn field(&self, column: &str) -> &Value {
        self.get(column)
    }
}

///
/// ResolvedRow
///
/// Row view that applies one naming convention when a column is not found
/// verbatim: the selector is tried as written first, then translated.
///

#[derive(Clone, Copy, Debug)]
pub struct ResolvedRow<'a> {
    row: &'a Row,
    naming: NamingConvention,
}

impl<'a> ResolvedRow<'a> {
    #[must_use]
    pub const fn new(row: &'a Row, naming: NamingConvention) -> Self {
        Self { row, naming }
    }

    #[must_use]
    pub const fn row(&self) -> &'a Row {
        self.row
    }
}

impl FieldSource for ResolvedRow<'_> {
    fn field(&self, column: &str) -> &Value {
        if let Some(value) = self.row.try_get(column) {
            return value;
        }
        if self.naming.is_identity() {
            return &NULL_VALUE;
        }

        self.row.get(&self.naming.to_column_name(column))
    }
}
