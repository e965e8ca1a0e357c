use crate::error::{ErrorKind, WeaveError};

///
/// WeaveTraceSink
///

pub trait WeaveTraceSink: Send + Sync {
    fn on_event(&self, event: WeaveTraceEvent<'_>);
}

///
/// WeaveTraceEvent
///
/// One observation of one descriptor level. `depth` is 0 for the root
/// descriptor and grows by one per nested mapping.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WeaveTraceEvent<'a> {
    Start {
        shape_id: &'a str,
        depth: usize,
    },
    RowDropped {
        shape_id: &'a str,
        depth: usize,
        row_index: usize,
        column: &'a str,
    },
    Finish {
        shape_id: &'a str,
        depth: usize,
        rows_in: usize,
        rows_dropped: usize,
        groups: usize,
    },
    Error {
        shape_id: &'a str,
        depth: usize,
        kind: ErrorKind,
    },
}

impl WeaveTraceEvent<'_> {
    #[must_use]
    pub const fn shape_id(&self) -> &str {
        match self {
            Self::Start { shape_id, .. }
            | Self::RowDropped { shape_id, .. }
            | Self::Finish { shape_id, .. }
            | Self::Error { shape_id, .. } => *shape_id,
        }
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        match self {
            Self::Start { depth, .. }
            | Self::RowDropped { depth, .. }
            | Self::Finish { depth, .. }
            | Self::Error { depth, .. } => *depth,
        }
    }
}

///
/// TraceScope
///
/// Start/finish bracket around one descriptor level. A scope is consumed
/// exactly once by `finish` or `error`.
///

pub(crate) struct TraceScope<'a> {
    sink: &'a dyn WeaveTraceSink,
    shape_id: &'a str,
    depth: usize,
}

impl<'a> TraceScope<'a> {
    pub(crate) fn start(
        sink: Option<&'a dyn WeaveTraceSink>,
        shape_id: &'a str,
        depth: usize,
    ) -> Option<Self> {
        let sink = sink?;
        sink.on_event(WeaveTraceEvent::Start { shape_id, depth });

        Some(Self {
            sink,
            shape_id,
            depth,
        })
    }

    pub(crate) fn row_dropped(&self, row_index: usize, column: &str) {
        self.sink.on_event(WeaveTraceEvent::RowDropped {
            shape_id: self.shape_id,
            depth: self.depth,
            row_index,
            column,
        });
    }

    pub(crate) fn finish(self, rows_in: usize, rows_dropped: usize, groups: usize) {
        self.sink.on_event(WeaveTraceEvent::Finish {
            shape_id: self.shape_id,
            depth: self.depth,
            rows_in,
            rows_dropped,
            groups,
        });
    }

    pub(crate) fn error(self, err: &WeaveError) {
        self.sink.on_event(WeaveTraceEvent::Error {
            shape_id: self.shape_id,
            depth: self.depth,
            kind: err.kind,
        });
    }
}
