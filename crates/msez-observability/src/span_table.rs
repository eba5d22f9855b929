//! # Span Table
//!
//! A small in-process registry of in-flight and recently-completed
//! spans, keyed by span id, with parent/child linkage and duration
//! tracking. `tracing::Span` remains the actual propagation mechanism
//! (thread-local context, subscriber fan-out); this table is the piece
//! the stack's own code queries directly — e.g. to report "how long
//! did the last commit span take" without round-tripping through a
//! subscriber.

use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::layer::StackLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone)]
pub struct SpanRecord {
    pub span_id: Uuid,
    pub parent_span_id: Option<Uuid>,
    pub name: String,
    pub layer: StackLayer,
    started_at: Instant,
    ended_at: Option<Instant>,
    pub status: SpanStatus,
}

impl SpanRecord {
    /// Duration so far if still open, or the final duration once ended.
    pub fn duration_ms(&self) -> f64 {
        let end = self.ended_at.unwrap_or_else(Instant::now);
        end.duration_since(self.started_at).as_secs_f64() * 1000.0
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SpanTable {
    spans: HashMap<Uuid, SpanRecord>,
    current: Option<Uuid>,
}

impl SpanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a span, nested under whichever span is currently open on
    /// this table (if any), and make it the new current span.
    pub fn start(&mut self, name: impl Into<String>, layer: StackLayer) -> Uuid {
        let span_id = Uuid::new_v4();
        let record = SpanRecord {
            span_id,
            parent_span_id: self.current,
            name: name.into(),
            layer,
            started_at: Instant::now(),
            ended_at: None,
            status: SpanStatus::Ok,
        };
        self.spans.insert(span_id, record);
        self.current = Some(span_id);
        span_id
    }

    /// End a span and restore its parent as the current span.
    pub fn end(&mut self, span_id: Uuid, status: SpanStatus) {
        let parent = self.spans.get(&span_id).and_then(|r| r.parent_span_id);
        if let Some(record) = self.spans.get_mut(&span_id) {
            record.ended_at = Some(Instant::now());
            record.status = status;
        }
        if self.current == Some(span_id) {
            self.current = parent;
        }
    }

    pub fn get(&self, span_id: Uuid) -> Option<&SpanRecord> {
        self.spans.get(&span_id)
    }

    pub fn open_count(&self) -> usize {
        self.spans.values().filter(|r| r.is_open()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_span_records_parent() {
        let mut table = SpanTable::new();
        let parent = table.start("outer", StackLayer::Api);
        let child = table.start("inner", StackLayer::Watcher);
        assert_eq!(table.get(child).unwrap().parent_span_id, Some(parent));
    }

    #[test]
    fn test_ending_child_restores_parent_as_current() {
        let mut table = SpanTable::new();
        let parent = table.start("outer", StackLayer::Api);
        let child = table.start("inner", StackLayer::Watcher);
        table.end(child, SpanStatus::Ok);
        let grandchild = table.start("inner2", StackLayer::Watcher);
        assert_eq!(table.get(grandchild).unwrap().parent_span_id, Some(parent));
    }

    #[test]
    fn test_open_count_excludes_ended_spans() {
        let mut table = SpanTable::new();
        let a = table.start("a", StackLayer::Vm);
        let _b = table.start("b", StackLayer::Vm);
        assert_eq!(table.open_count(), 2);
        table.end(a, SpanStatus::Ok);
        assert_eq!(table.open_count(), 1);
    }

    #[test]
    fn test_error_status_recorded() {
        let mut table = SpanTable::new();
        let a = table.start("a", StackLayer::Vm);
        table.end(a, SpanStatus::Error);
        assert_eq!(table.get(a).unwrap().status, SpanStatus::Error);
    }
}
