//! Metrics sink boundary.
//!
//! All instrumentation flows through MetricsEvent and MetricsSink.
//! Sinks are injected per compiling context so concurrent queries never
//! share hidden metrics state.

use crate::plan::{PlanType, ReadRequestMode};

///
/// PartitionRoutingOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PartitionRoutingOutcome {
    /// Every row resolved to a partition id.
    Resolved,
    /// At least one row failed; the whole routing result was discarded.
    Discarded,
    /// Resolution does not apply (no partition expression, or a global
    /// index without the partition column).
    Skipped,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    NodeBuilt {
        tp: PlanType,
    },
    ReadRouted {
        mode: ReadRequestMode,
        marked_scans: usize,
    },
    PartitionRouting {
        rows: usize,
        outcome: PartitionRoutingOutcome,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}

///
/// NoopMetricsSink
/// Default sink when the embedding engine does not collect planner metrics.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _event: MetricsEvent) {}
}
