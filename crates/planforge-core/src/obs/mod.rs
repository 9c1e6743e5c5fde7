//! Observability: construction telemetry (metrics) and sink abstractions.
//!
//! Plan construction never touches metrics state directly; it emits
//! `MetricsEvent`s into the sink carried by its `PlanContext`.

mod metrics;
mod sink;

pub use metrics::{MetricsReport, PlanMetrics};
pub use sink::{MetricsEvent, MetricsSink, NoopMetricsSink, PartitionRoutingOutcome};
