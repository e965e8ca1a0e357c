use crate::{
    descriptor::{KeyComponent, KeySpec},
    error::WeaveError,
    row::FieldSource,
    value::{StableHash, Value, hash_key_tuple},
};

///
/// GroupKey
///
/// Evaluated key tuple of one row plus its stable hash.
/// Equality is pointwise canonical value equality.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GroupKey {
    values: Vec<Value>,
    hash: StableHash,
}

impl GroupKey {
    #[must_use]
    pub(crate) fn new(values: Vec<Value>) -> Self {
        let hash = hash_key_tuple(&values);

        Self { values, hash }
    }

    #[must_use]
    pub(crate) const fn hash(&self) -> StableHash {
        self.hash
    }

    #[must_use]
    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}

///
/// KeyOutcome
///

#[derive(Debug)]
pub(crate) enum KeyOutcome {
    Key(GroupKey),

    /// Row dropped because `column` is null under `skip_null`.
    Dropped { column: String },
}

/// Evaluate one key spec against one row.
///
/// A null component drops the row under `skip_null`; without it, strict
/// keys reject the row and lenient keys keep null as a key value.
pub(crate) fn evaluate_key<R: FieldSource + ?Sized>(
    shape_id: &str,
    spec: &KeySpec,
    row: &R,
    strict_keys: bool,
) -> Result<KeyOutcome, WeaveError> {
    let mut values = Vec::with_capacity(spec.arity());

    for component in spec.components() {
        let value = component
            .selector()
            .resolve(row)
            .map_err(|err| WeaveError::conversion(shape_id, component_name(component), err))?;

        if value.is_null() {
            if spec.skips_null() {
                return Ok(KeyOutcome::Dropped {
                    column: component.selector().column().to_string(),
                });
            }
            if strict_keys {
                return Err(WeaveError::missing_key_component(
                    shape_id,
                    component_name(component),
                ));
            }
        }

        values.push(value);
    }

    Ok(KeyOutcome::Key(GroupKey::new(values)))
}

fn component_name(component: &KeyComponent) -> &str {
    component
        .target()
        .unwrap_or_else(|| component.selector().column())
}
