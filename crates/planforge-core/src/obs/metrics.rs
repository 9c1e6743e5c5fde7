use crate::{
    obs::sink::{MetricsEvent, MetricsSink, PartitionRoutingOutcome},
    plan::ReadRequestMode,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// PlanMetrics
/// In-memory counters for plan construction, safe to share across
/// concurrently compiling queries.
///

#[derive(Debug, Default)]
pub struct PlanMetrics {
    nodes_built: AtomicU64,
    reads_row_cop: AtomicU64,
    reads_batch_cop: AtomicU64,
    reads_dataflow: AtomicU64,
    scans_marked: AtomicU64,
    partition_resolved: AtomicU64,
    partition_discarded: AtomicU64,
    partition_skipped: AtomicU64,
    partition_rows: AtomicU64,
}

///
/// MetricsReport
/// Point-in-time snapshot of `PlanMetrics`.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MetricsReport {
    pub nodes_built: u64,
    pub reads_row_cop: u64,
    pub reads_batch_cop: u64,
    pub reads_dataflow: u64,
    pub scans_marked: u64,
    pub partition_resolved: u64,
    pub partition_discarded: u64,
    pub partition_skipped: u64,
    pub partition_rows: u64,
}

impl PlanMetrics {
    #[must_use]
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            nodes_built: self.nodes_built.load(Ordering::Relaxed),
            reads_row_cop: self.reads_row_cop.load(Ordering::Relaxed),
            reads_batch_cop: self.reads_batch_cop.load(Ordering::Relaxed),
            reads_dataflow: self.reads_dataflow.load(Ordering::Relaxed),
            scans_marked: self.scans_marked.load(Ordering::Relaxed),
            partition_resolved: self.partition_resolved.load(Ordering::Relaxed),
            partition_discarded: self.partition_discarded.load(Ordering::Relaxed),
            partition_skipped: self.partition_skipped.load(Ordering::Relaxed),
            partition_rows: self.partition_rows.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl MetricsSink for PlanMetrics {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::NodeBuilt { .. } => bump(&self.nodes_built, 1),
            MetricsEvent::ReadRouted { mode, marked_scans } => {
                let counter = match mode {
                    ReadRequestMode::RowCoprocessor => &self.reads_row_cop,
                    ReadRequestMode::BatchedCoprocessor => &self.reads_batch_cop,
                    ReadRequestMode::ParallelDataflow => &self.reads_dataflow,
                };
                bump(counter, 1);
                bump(&self.scans_marked, marked_scans as u64);
            }
            MetricsEvent::PartitionRouting { rows, outcome } => {
                let counter = match outcome {
                    PartitionRoutingOutcome::Resolved => &self.partition_resolved,
                    PartitionRoutingOutcome::Discarded => &self.partition_discarded,
                    PartitionRoutingOutcome::Skipped => &self.partition_skipped,
                };
                bump(counter, 1);
                bump(&self.partition_rows, rows as u64);
            }
        }
    }
}
