use crate::obs::{WeaveTraceEvent, WeaveTraceSink};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// NoopSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl WeaveTraceSink for NoopSink {
    fn on_event(&self, _: WeaveTraceEvent<'_>) {}
}

///
/// TracingSink
///
/// Forwards events to the `tracing` crate. Root-level events log at debug,
/// nested levels at trace, failures at warn.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl WeaveTraceSink for TracingSink {
    fn on_event(&self, event: WeaveTraceEvent<'_>) {
        match event {
            WeaveTraceEvent::Start { shape_id, depth } => {
                if depth == 0 {
                    tracing::debug!(shape = %shape_id, "ingest started");
                } else {
                    tracing::trace!(shape = %shape_id, depth, "nested ingest started");
                }
            }
            WeaveTraceEvent::RowDropped {
                shape_id,
                depth,
                row_index,
                column,
            } => {
                tracing::trace!(shape = %shape_id, depth, row_index, column, "row dropped for null key");
            }
            WeaveTraceEvent::Finish {
                shape_id,
                depth,
                rows_in,
                rows_dropped,
                groups,
            } => {
                if depth == 0 {
                    tracing::debug!(shape = %shape_id, rows_in, rows_dropped, groups, "ingest finished");
                } else {
                    tracing::trace!(shape = %shape_id, depth, rows_in, rows_dropped, groups, "nested ingest finished");
                }
            }
            WeaveTraceEvent::Error {
                shape_id,
                depth,
                kind,
            } => {
                tracing::warn!(shape = %shape_id, depth, kind = %kind, "ingest failed");
            }
        }
    }
}

///
/// CountingSink
///
/// Lock-free event counters. Safe to share across concurrent ingest calls.
///

#[derive(Debug, Default)]
pub struct CountingSink {
    ingests: AtomicU64,
    nested_ingests: AtomicU64,
    rows_in: AtomicU64,
    rows_dropped: AtomicU64,
    groups: AtomicU64,
    errors: AtomicU64,
}

///
/// CountingReport
///
/// Point-in-time snapshot of a `CountingSink`. Row and group totals cover
/// every level, nested ones included.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CountingReport {
    pub ingests: u64,
    pub nested_ingests: u64,
    pub rows_in: u64,
    pub rows_dropped: u64,
    pub groups: u64,
    pub errors: u64,
}

impl CountingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> CountingReport {
        CountingReport {
            ingests: self.ingests.load(Ordering::Relaxed),
            nested_ingests: self.nested_ingests.load(Ordering::Relaxed),
            rows_in: self.rows_in.load(Ordering::Relaxed),
            rows_dropped: self.rows_dropped.load(Ordering::Relaxed),
            groups: self.groups.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl WeaveTraceSink for CountingSink {
    fn on_event(&self, event: WeaveTraceEvent<'_>) {
        match event {
            WeaveTraceEvent::Start { depth: 0, .. } => {
                self.ingests.fetch_add(1, Ordering::Relaxed);
            }
            WeaveTraceEvent::Start { .. } => {
                self.nested_ingests.fetch_add(1, Ordering::Relaxed);
            }
            WeaveTraceEvent::RowDropped { .. } => {}
            WeaveTraceEvent::Finish {
                rows_in,
                rows_dropped,
                groups,
                ..
            } => {
                self.rows_in.fetch_add(widen(rows_in), Ordering::Relaxed);
                self.rows_dropped
                    .fetch_add(widen(rows_dropped), Ordering::Relaxed);
                self.groups.fetch_add(widen(groups), Ordering::Relaxed);
            }
            WeaveTraceEvent::Error { .. } => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

fn widen(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
