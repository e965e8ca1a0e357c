use rowweave_core::{
    config::WeaveConfig,
    descriptor::MappingDescriptor,
    engine::{Engine, ExecutionBudget},
    error::WeaveError,
    materialize::{JsonMaterializer, MaterializedGroup, Materializer, SerdeMaterializer},
    obs::{TracingSink, WeaveTraceSink},
    row::Row,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

///
/// Weaver
///
/// Session wrapper around one engine. Holds immutable configuration and an
/// optional trace sink; cheap to clone and safe to share across threads.
///

#[derive(Clone, Debug, Default)]
pub struct Weaver {
    config: WeaveConfig,
    engine: Engine,
}

impl Weaver {
    #[must_use]
    pub fn new(config: WeaveConfig) -> Self {
        Self {
            engine: Engine::from_config(&config),
            config,
        }
    }

    /// Route engine events to the provided sink for every call on this session.
    #[must_use]
    pub fn trace_sink(mut self, sink: Arc<dyn WeaveTraceSink>) -> Self {
        self.engine = self.engine.with_trace(sink);
        self
    }

    /// Forward engine events to `tracing`.
    #[must_use]
    pub fn traced(self) -> Self {
        self.trace_sink(Arc::new(TracingSink))
    }

    #[must_use]
    pub const fn config(&self) -> &WeaveConfig {
        &self.config
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    //
    // Entry points
    //

    /// Finalized groups, before any materialization.
    pub fn groups<I>(
        &self,
        descriptor: &MappingDescriptor,
        rows: I,
    ) -> Result<Vec<MaterializedGroup>, WeaveError>
    where
        I: IntoIterator<Item = Row>,
    {
        self.engine.ingest(descriptor, rows)
    }

    /// Finalized groups plus the resources the call consumed.
    pub fn groups_with_budget<I>(
        &self,
        descriptor: &MappingDescriptor,
        rows: I,
    ) -> Result<(Vec<MaterializedGroup>, ExecutionBudget), WeaveError>
    where
        I: IntoIterator<Item = Row>,
    {
        self.engine.ingest_with_budget(descriptor, rows)
    }

    /// Weave rows into caller structs via serde.
    pub fn weave<T, I>(&self, descriptor: &MappingDescriptor, rows: I) -> Result<Vec<T>, WeaveError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = Row>,
    {
        self.weave_with(descriptor, rows, &SerdeMaterializer::<T>::new())
    }

    /// Weave rows into ordered JSON objects.
    pub fn weave_json<I>(
        &self,
        descriptor: &MappingDescriptor,
        rows: I,
    ) -> Result<Vec<serde_json::Value>, WeaveError>
    where
        I: IntoIterator<Item = Row>,
    {
        self.weave_with(descriptor, rows, &JsonMaterializer::new())
    }

    /// Weave rows through any materializer. Conversion stops at the first
    /// group that fails; no partial list is returned.
    pub fn weave_with<M, I>(
        &self,
        descriptor: &MappingDescriptor,
        rows: I,
        materializer: &M,
    ) -> Result<Vec<M::Output>, WeaveError>
    where
        M: Materializer,
        I: IntoIterator<Item = Row>,
    {
        let groups = self.groups(descriptor, rows)?;

        groups
            .iter()
            .map(|group| {
                materializer
                    .materialize(group)
                    .map_err(|err| WeaveError::materialization(group.shape_id(), err))
            })
            .collect()
    }
}
