//! One descriptor level of an ingest call.
//!
//! A level consumes its row stream in a single pass, then finalizes groups
//! in first-seen order, recursing into each nested mapping over that
//! group's buffered rows.

use crate::{
    descriptor::{LayoutSlot, MappingDescriptor},
    engine::{
        context::{ExecutionContext, LimitExceeded},
        key::{GroupKey, KeyOutcome, evaluate_key},
        state::AggregateState,
        table::{Group, GroupTable},
    },
    error::WeaveError,
    materialize::{MaterializedGroup, MaterializedValue},
    obs::{TraceScope, WeaveTraceSink},
    predicate,
    row::{ResolvedRow, Row},
    value::Value,
};
use std::rc::Rc;

///
/// LevelRun
///

pub(crate) struct LevelRun<'a> {
    descriptor: &'a MappingDescriptor,
    depth: usize,
    trace: Option<&'a dyn WeaveTraceSink>,
}

///
/// LevelStats
///

#[derive(Clone, Copy, Debug, Default)]
struct LevelStats {
    rows_in: usize,
    rows_dropped: usize,
}

impl<'a> LevelRun<'a> {
    pub(crate) const fn new(
        descriptor: &'a MappingDescriptor,
        depth: usize,
        trace: Option<&'a dyn WeaveTraceSink>,
    ) -> Self {
        Self {
            descriptor,
            depth,
            trace,
        }
    }

    /// Run this level to completion, bracketed by one trace scope.
    pub(crate) fn run<I>(
        &self,
        rows: I,
        ctx: &mut ExecutionContext,
    ) -> Result<Vec<MaterializedGroup>, WeaveError>
    where
        I: IntoIterator<Item = Rc<Row>>,
    {
        let scope = TraceScope::start(self.trace, self.descriptor.shape_id(), self.depth);
        let mut stats = LevelStats::default();

        let result = self
            .consume(rows, ctx, scope.as_ref(), &mut stats)
            .and_then(|table| {
                let groups = table.len();
                self.finalize(table, ctx).map(|out| (out, groups))
            });

        match result {
            Ok((out, groups)) => {
                if let Some(scope) = scope {
                    scope.finish(stats.rows_in, stats.rows_dropped, groups);
                }
                Ok(out)
            }
            Err(err) => {
                if let Some(scope) = scope {
                    scope.error(&err);
                }
                Err(err)
            }
        }
    }

    // Phase 1: single pass over the row stream.
    fn consume<I>(
        &self,
        rows: I,
        ctx: &mut ExecutionContext,
        scope: Option<&TraceScope<'_>>,
        stats: &mut LevelStats,
    ) -> Result<GroupTable, WeaveError>
    where
        I: IntoIterator<Item = Rc<Row>>,
    {
        let descriptor = self.descriptor;
        let shape_id = descriptor.shape_id();
        let config = *ctx.config();
        let mut table = GroupTable::new();

        for (row_index, row) in rows.into_iter().enumerate() {
            stats.rows_in += 1;
            let resolved = ResolvedRow::new(&row, config.naming());

            // key
            let key = match evaluate_key(shape_id, descriptor.key(), &resolved, config.strict_keys())? {
                KeyOutcome::Key(key) => key,
                KeyOutcome::Dropped { column } => {
                    stats.rows_dropped += 1;
                    if config.detailed_tracing()
                        && let Some(scope) = scope
                    {
                        scope.row_dropped(row_index, &column);
                    }
                    continue;
                }
            };

            // group
            let (group, created) = table
                .find_or_insert_with(key, ctx, |key| self.new_group(key))
                .map_err(|err| limit_error(shape_id, err))?;

            // fields: first row wins, so only the creating row resolves them
            if created {
                for field in descriptor.fields() {
                    let value = field
                        .selector()
                        .resolve(&resolved)
                        .map_err(|err| WeaveError::conversion(shape_id, field.target(), err))?;
                    group.fields.push(value);
                }
            }

            // aggregates
            for (spec, state) in descriptor.aggregates().iter().zip(group.aggregates.iter_mut()) {
                if let Some(filter) = spec.filter_predicate()
                    && !predicate::eval(&resolved, filter)
                {
                    continue;
                }

                let Some(source) = spec.source() else {
                    state.count_row();
                    continue;
                };
                source
                    .resolve(&resolved)
                    .and_then(|value| state.apply(value))
                    .map_err(|err| WeaveError::conversion(shape_id, spec.target(), err))?;
            }

            // nested buffers
            for buffer in &mut group.buffers {
                ctx.record_buffered_row()
                    .map_err(|err| limit_error(shape_id, err))?;
                buffer.push(Rc::clone(&row));
            }
        }

        Ok(table)
    }

    fn new_group(&self, key: GroupKey) -> Group {
        let descriptor = self.descriptor;

        Group {
            key,
            fields: Vec::with_capacity(descriptor.fields().len()),
            aggregates: descriptor
                .aggregates()
                .iter()
                .map(|spec| AggregateState::for_kind(spec.kind()))
                .collect(),
            buffers: vec![Vec::new(); descriptor.nested().len()],
        }
    }

    // Phase 2: finalize groups in first-seen order.
    fn finalize(
        &self,
        table: GroupTable,
        ctx: &mut ExecutionContext,
    ) -> Result<Vec<MaterializedGroup>, WeaveError> {
        let mut out = Vec::with_capacity(table.len());
        for group in table.into_groups() {
            out.push(self.finalize_group(group, ctx)?);
        }

        Ok(out)
    }

    fn finalize_group(
        &self,
        group: Group,
        ctx: &mut ExecutionContext,
    ) -> Result<MaterializedGroup, WeaveError> {
        let descriptor = self.descriptor;
        let shape_id = descriptor.shape_id();
        let Group {
            key,
            fields,
            aggregates,
            buffers,
        } = group;

        let mut aggregate_values = Vec::with_capacity(aggregates.len());
        for (spec, state) in descriptor.aggregates().iter().zip(aggregates) {
            let finalized = state.finalize().and_then(|value| match spec.output_cast() {
                Some(cast) => cast.apply(&value),
                None => Ok(value),
            });
            aggregate_values
                .push(finalized.map_err(|err| WeaveError::conversion(shape_id, spec.target(), err))?);
        }

        let mut collections = Vec::with_capacity(buffers.len());
        for (nested, buffer) in descriptor.nested().iter().zip(buffers) {
            let child = LevelRun::new(nested.descriptor(), self.depth + 1, self.trace);
            let groups = child
                .run(buffer, ctx)
                .map_err(|err| err.nested_under(nested.target()))?;
            collections.push(groups);
        }

        let key_values = key.into_values();
        let mut fields = fields.into_iter().map(Some).collect::<Vec<_>>();
        let mut aggregate_values = aggregate_values.into_iter().map(Some).collect::<Vec<_>>();
        let mut collections = collections.into_iter().map(Some).collect::<Vec<_>>();

        let mut entries = Vec::with_capacity(descriptor.layout().len());
        for slot in descriptor.layout() {
            let Some(target) = descriptor.slot_target(*slot) else {
                continue;
            };
            let value = match *slot {
                LayoutSlot::Key(index) => key_values
                    .get(index)
                    .cloned()
                    .map(MaterializedValue::Scalar),
                LayoutSlot::Field(index) => take(&mut fields, index).map(MaterializedValue::Scalar),
                LayoutSlot::Aggregate(index) => {
                    take(&mut aggregate_values, index).map(MaterializedValue::Scalar)
                }
                LayoutSlot::Nested(index) => {
                    take(&mut collections, index).map(MaterializedValue::Collection)
                }
            };

            entries.push((
                target.to_string(),
                value.unwrap_or(MaterializedValue::Scalar(Value::Null)),
            ));
        }

        Ok(MaterializedGroup::new(shape_id, key_values, entries))
    }
}

fn take<T>(slots: &mut [Option<T>], index: usize) -> Option<T> {
    slots.get_mut(index).and_then(Option::take)
}

fn limit_error(shape_id: &str, err: LimitExceeded) -> WeaveError {
    WeaveError::resource_limit(shape_id, err.limit, err.max)
}
