//! Core runtime for rowweave: column values, rows, mapping descriptors, the
//! grouping/aggregation engine, and materializers.
//!
//! A caller hands the engine one [`descriptor::MappingDescriptor`] and an
//! ordered stream of [`row::Row`]s (typically denormalized join output). The
//! engine groups rows by the descriptor's key, folds aggregates, buffers rows
//! for nested collections and returns finalized groups in first-seen order.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod materialize;
pub mod naming;
pub mod obs;
pub mod predicate;
pub mod row;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary used to author descriptors and
/// consume results. Sinks and engine internals stay one level down.
///

pub mod prelude {
    pub use crate::{
        config::WeaveConfig,
        descriptor::{
            AggregateKind, AggregateSpec, FieldSelector, KeyComponent, KeySpec, MappingDescriptor,
        },
        engine::{Engine, ingest},
        error::{ErrorKind, WeaveError},
        materialize::{FromGroup, GroupView, MaterializedGroup, MaterializedValue, Materializer},
        naming::NamingConvention,
        predicate::Predicate,
        row::Row,
        value::{Value, ValueType},
    };
}
