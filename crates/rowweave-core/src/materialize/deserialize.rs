use crate::materialize::{
    DecimalMode, JsonMaterializer, MaterializeError, MaterializedGroup, Materializer,
};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

///
/// SerdeMaterializer
///
/// Deserializes each group into `T` through its JSON rendering. Entry names
/// are the serde field names; nested collections deserialize as `Vec<_>`.
///

#[derive(Debug)]
pub struct SerdeMaterializer<T> {
    json: JsonMaterializer,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeMaterializer<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            json: JsonMaterializer::new(),
            _marker: PhantomData,
        }
    }

    /// Hand decimals to `T` as text so `Decimal` fields round-trip exactly.
    #[must_use]
    pub const fn lossless_decimals(mut self) -> Self {
        self.json = self.json.with_decimals(DecimalMode::String);
        self
    }
}

impl<T> Default for SerdeMaterializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeMaterializer<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SerdeMaterializer<T> {}

impl<T: DeserializeOwned> Materializer for SerdeMaterializer<T> {
    type Output = T;

    fn materialize(&self, group: &MaterializedGroup) -> Result<T, MaterializeError> {
        serde_json::from_value(self.json.to_json(group)).map_err(|source| {
            MaterializeError::Deserialize {
                shape_id: group.shape_id().to_string(),
                source,
            }
        })
    }
}
