//! Module: engine
//! Responsibility: row-by-row grouping and aggregation driven by one descriptor.
//! Does not own: descriptor authoring or output conversion.
//! Boundary: `Engine::ingest` validates, runs every level, and returns either
//! the complete group list or one structured error.

mod context;
mod key;
mod level;
mod state;
mod table;


use crate::{
    config::WeaveConfig,
    descriptor::MappingDescriptor,
    error::WeaveError,
    materialize::MaterializedGroup,
    obs::{TraceScope, WeaveTraceSink},
    row::Row,
};
use std::{fmt, rc::Rc, sync::Arc};

pub use context::{ExecutionBudget, ExecutionConfig};

use context::ExecutionContext;
use level::LevelRun;

///
/// Engine
///
/// Immutable configuration plus an optional trace sink. Each `ingest` call
/// owns a private group table and budget, so one engine may serve
/// concurrent calls.
///

#[derive(Clone, Default)]
pub struct Engine {
    config: ExecutionConfig,
    trace: Option<Arc<dyn WeaveTraceSink>>,
}

impl Engine {
    #[must_use]
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            trace: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &WeaveConfig) -> Self {
        Self::new(config.execution_config())
    }

    /// Attach a trace sink. Tracing never changes ingest results.
    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn WeaveTraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Group, aggregate and nest `rows` according to `descriptor`.
    ///
    /// The row source is drained fully. Any failure aborts the whole call:
    /// no partial result list is ever returned.
    pub fn ingest<I>(
        &self,
        descriptor: &MappingDescriptor,
        rows: I,
    ) -> Result<Vec<MaterializedGroup>, WeaveError>
    where
        I: IntoIterator<Item = Row>,
    {
        self.ingest_with_budget(descriptor, rows).map(|(groups, _)| groups)
    }

    /// Like `ingest`, also reporting the resources the call consumed.
    pub fn ingest_with_budget<I>(
        &self,
        descriptor: &MappingDescriptor,
        rows: I,
    ) -> Result<(Vec<MaterializedGroup>, ExecutionBudget), WeaveError>
    where
        I: IntoIterator<Item = Row>,
    {
        let trace = self.trace.as_deref();

        if let Err(err) = descriptor.validate() {
            let err = WeaveError::descriptor(descriptor.shape_id(), err);
            if let Some(scope) = TraceScope::start(trace, descriptor.shape_id(), 0) {
                scope.error(&err);
            }
            return Err(err);
        }

        let mut ctx = ExecutionContext::new(self.config);
        let groups = LevelRun::new(descriptor, 0, trace).run(rows.into_iter().map(Rc::new), &mut ctx)?;

        Ok((groups, *ctx.budget()))
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

/// Ingest with the default (unbounded, untraced) engine.
pub fn ingest<I>(
    descriptor: &MappingDescriptor,
    rows: I,
) -> Result<Vec<MaterializedGroup>, WeaveError>
where
    I: IntoIterator<Item = Row>,
{
    Engine::default().ingest(descriptor, rows)
}
