//! Insertion-ordered group table.
//!
//! Groups live in a dense vector in first-seen order; stable-hash buckets
//! index into it. Hash collisions are resolved by canonical key equality, so
//! bucket layout never influences output order.

use crate::{
    engine::{
        context::{ExecutionContext, LimitExceeded},
        key::GroupKey,
        state::AggregateState,
    },
    row::Row,
    value::{StableHash, Value},
};
use std::{collections::HashMap, rc::Rc};

///
/// Group
///
/// Accumulator state for one distinct key at one descriptor level.
///

#[derive(Debug)]
pub(crate) struct Group {
    pub(crate) key: GroupKey,

    /// First-seen value per field mapping, in descriptor order.
    pub(crate) fields: Vec<Value>,

    /// One reducer per aggregate spec, in descriptor order.
    pub(crate) aggregates: Vec<AggregateState>,

    /// Append-only row buffer per nested mapping.
    pub(crate) buffers: Vec<Vec<Rc<Row>>>,
}

///
/// GroupTable
///

#[derive(Debug, Default)]
pub(crate) struct GroupTable {
    groups: Vec<Group>,
    buckets: HashMap<StableHash, Vec<usize>>,
}

impl GroupTable {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Position of the group for `key`, if one exists.
    #[must_use]
    pub(crate) fn find(&self, key: &GroupKey) -> Option<usize> {
        self.buckets
            .get(&key.hash())?
            .iter()
            .copied()
            .find(|&slot| self.groups[slot].key.values() == key.values())
    }

    /// Return the group for `key`, creating it with `init` on first sight.
    /// The flag is true when the group was created by this call.
    ///
    /// New groups are charged against the execution budget before insertion.
    pub(crate) fn find_or_insert_with(
        &mut self,
        key: GroupKey,
        ctx: &mut ExecutionContext,
        init: impl FnOnce(GroupKey) -> Group,
    ) -> Result<(&mut Group, bool), LimitExceeded> {
        if let Some(slot) = self.find(&key) {
            return Ok((&mut self.groups[slot], false));
        }

        ctx.record_new_group()?;

        let slot = self.groups.len();
        self.buckets.entry(key.hash()).or_default().push(slot);
        self.groups.push(init(key));

        Ok((&mut self.groups[slot], true))
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    /// Consume the table, yielding groups in first-seen order.
    pub(crate) fn into_groups(self) -> impl Iterator<Item = Group> {
        self.groups.into_iter()
    }
}
