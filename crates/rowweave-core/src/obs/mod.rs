//! Ingest tracing boundary.
//!
//! Tracing is optional and injected by the caller. It must not affect
//! ingest semantics. Engine code emits `WeaveTraceEvent`s through a
//! `WeaveTraceSink`; nothing here touches global state.

mod sink;
mod trace;

pub use sink::{CountingReport, CountingSink, NoopSink, TracingSink};
pub use trace::{WeaveTraceEvent, WeaveTraceSink};

pub(crate) use trace::TraceScope;
