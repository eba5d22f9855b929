//! # msez-observability
//!
//! Correlation IDs, a layer-tagged span table, and Prometheus metrics
//! registration, consumed by `msez-api` and `msez-cli`.
//!
//! ## Implements
//!
//! Grounded on `original_source/tools/phoenix/observability.py`'s
//! `Tracer`/`Span`/correlation-id machinery, reimplemented atop the
//! teacher's existing `tracing`/`metrics` dependency stack rather than
//! a bespoke logging framework — `PhoenixLogger`'s structured-JSON
//! handler is exactly what `tracing-subscriber`'s `fmt().json()` layer
//! already provides.

mod correlation;
mod layer;
mod metrics_registry;
mod span_table;

pub use correlation::generate_correlation_id;
pub use layer::StackLayer;
pub use metrics_registry::install_prometheus_recorder;
pub use span_table::{SpanRecord, SpanStatus, SpanTable};
