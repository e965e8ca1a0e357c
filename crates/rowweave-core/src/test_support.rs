//! Shared fixtures for unit tests.

use crate::{
    error::ErrorKind,
    obs::{WeaveTraceEvent, WeaveTraceSink},
    row::Row,
    value::Value,
};
use std::sync::Mutex;

/// Denormalized listing rows: make, model, price.
pub(crate) fn vehicle_rows() -> Vec<Row> {
    vec![
        vehicle(1, "Toyota", "Corolla", 20_000),
        vehicle(2, "Toyota", "Camry", 30_000),
        vehicle(3, "Honda", "Civic", 15_000),
    ]
}

pub(crate) fn vehicle(id: i64, make: &str, model: &str, price: i64) -> Row {
    Row::new()
        .with("id", id)
        .with("make", make)
        .with("model", model)
        .with("price", price)
}

/// Order/line join output: one row per line item.
pub(crate) fn order_line(order_id: i64, customer: &str, line_id: Option<i64>, qty: i64) -> Row {
    Row::new()
        .with("order_id", order_id)
        .with("customer", customer)
        .with("line_id", line_id.map_or(Value::Null, Value::Int))
        .with("qty", qty)
}

///
/// OwnedTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum OwnedTraceEvent {
    Start {
        shape_id: String,
        depth: usize,
    },
    RowDropped {
        shape_id: String,
        row_index: usize,
        column: String,
    },
    Finish {
        shape_id: String,
        depth: usize,
        rows_in: usize,
        rows_dropped: usize,
        groups: usize,
    },
    Error {
        shape_id: String,
        kind: ErrorKind,
    },
}

///
/// RecordingSink
///

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<OwnedTraceEvent>>,
}

impl RecordingSink {
    // Clear and return all buffered events for structural assertions.
    pub(crate) fn take(&self) -> Vec<OwnedTraceEvent> {
        let mut events = self.events.lock().expect("trace event lock should succeed");
        std::mem::take(&mut *events)
    }
}

impl WeaveTraceSink for RecordingSink {
    fn on_event(&self, event: WeaveTraceEvent<'_>) {
        let owned = match event {
            WeaveTraceEvent::Start { shape_id, depth } => OwnedTraceEvent::Start {
                shape_id: shape_id.to_string(),
                depth,
            },
            WeaveTraceEvent::RowDropped {
                shape_id,
                row_index,
                column,
                ..
            } => OwnedTraceEvent::RowDropped {
                shape_id: shape_id.to_string(),
                row_index,
                column: column.to_string(),
            },
            WeaveTraceEvent::Finish {
                shape_id,
                depth,
                rows_in,
                rows_dropped,
                groups,
            } => OwnedTraceEvent::Finish {
                shape_id: shape_id.to_string(),
                depth,
                rows_in,
                rows_dropped,
                groups,
            },
            WeaveTraceEvent::Error { shape_id, kind, .. } => OwnedTraceEvent::Error {
                shape_id: shape_id.to_string(),
                kind,
            },
        };

        self.events
            .lock()
            .expect("trace event lock should succeed")
            .push(owned);
    }
}
