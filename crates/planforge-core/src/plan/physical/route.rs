//! Module: plan::physical::route
//! Responsibility: read-request mode selection for table readers and the
//! propagation of that mode onto every table scan of the pushed-down subtree.
//! Does not own: request serialization or replica selection.
//! Boundary: `decide_route` is pure; `apply_route` is the only mutation and
//! runs before the subtree is shared.

use crate::{
    catalog::StoreEngine,
    config::BatchCopPolicy,
    error::InternalError,
    plan::{
        PlanId,
        physical::{PhysicalOp, PhysicalPlan, flatten::subtree_view},
    },
};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// ReadRequestMode
///
/// Wire-level dispatch mode of a table reader's pushed-down subtree.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub enum ReadRequestMode {
    /// One coprocessor request per storage region.
    #[default]
    RowCoprocessor,
    /// Regions grouped into fewer, larger requests on the columnar engine.
    BatchedCoprocessor,
    /// Distributed dataflow fragments exchanging data between tasks.
    ParallelDataflow,
}

impl ReadRequestMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RowCoprocessor => "cop",
            Self::BatchedCoprocessor => "batchCop",
            Self::ParallelDataflow => "mpp",
        }
    }

    /// Whether scans must be stamped with this mode.
    #[must_use]
    pub const fn is_upgraded(self) -> bool {
        !matches!(self, Self::RowCoprocessor)
    }
}

impl fmt::Display for ReadRequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// RouteDecision
///
/// Output of the pure routing phase: the chosen mode and the ids of the
/// table scans that must carry it.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteDecision {
    pub mode: ReadRequestMode,
    pub scans_to_mark: Vec<PlanId>,
}

impl RouteDecision {
    const fn row_coprocessor() -> Self {
        Self {
            mode: ReadRequestMode::RowCoprocessor,
            scans_to_mark: Vec::new(),
        }
    }
}

/// Choose the read-request mode for the subtree rooted at `root`.
///
/// Precedence: non-columnar engine, exchange-send root, no table scans,
/// any order-preserving scan, then the session batching policy.
#[must_use]
pub fn decide_route(
    root: &PhysicalPlan,
    store_engine: StoreEngine,
    policy: BatchCopPolicy,
) -> RouteDecision {
    if !store_engine.is_columnar() {
        return RouteDecision::row_coprocessor();
    }

    let nodes = subtree_view(root);
    let scans = nodes
        .iter()
        .filter(|plan| plan.op().as_table_scan().is_some())
        .collect::<Vec<_>>();
    let upgrade = |mode| RouteDecision {
        mode,
        scans_to_mark: scans.iter().map(|plan| plan.id()).collect(),
    };

    if matches!(root.op(), PhysicalOp::ExchangeSender { .. }) {
        return upgrade(ReadRequestMode::ParallelDataflow);
    }
    if scans.is_empty() {
        return RouteDecision::row_coprocessor();
    }
    if scans
        .iter()
        .filter_map(|plan| plan.op().as_table_scan())
        .any(|scan| scan.keep_order)
    {
        return RouteDecision::row_coprocessor();
    }

    let batched = match policy {
        BatchCopPolicy::Never => false,
        BatchCopPolicy::AggOrTopN => nodes.iter().any(|plan| plan.tp().is_pre_reduction()),
        BatchCopPolicy::Always => true,
    };

    if batched {
        upgrade(ReadRequestMode::BatchedCoprocessor)
    } else {
        RouteDecision::row_coprocessor()
    }
}

/// Stamp the decided mode onto every scan named by `decision`.
///
/// The subtree must still be exclusively owned; a shared child cannot be
/// written and is reported as an invariant violation. Returns the number of
/// scans marked.
pub fn apply_route(
    root: &mut PhysicalPlan,
    decision: &RouteDecision,
) -> Result<usize, InternalError> {
    if decision.scans_to_mark.is_empty() {
        return Ok(0);
    }

    let marked = mark_scans(root, decision)?;
    if marked != decision.scans_to_mark.len() {
        return Err(InternalError::route_invariant(format!(
            "route marked {marked} of {} table scans",
            decision.scans_to_mark.len(),
        )));
    }

    Ok(marked)
}

fn mark_scans(plan: &mut PhysicalPlan, decision: &RouteDecision) -> Result<usize, InternalError> {
    let id = plan.id();
    let mut marked = 0;

    if let PhysicalOp::TableScan(scan) = plan.op_mut()
        && decision.scans_to_mark.contains(&id)
    {
        scan.set_read_mode(decision.mode);
        marked += 1;
    }

    for child in plan.children_mut() {
        let explain_id = child.explain_id();
        let child = Arc::get_mut(child).ok_or_else(|| {
            InternalError::route_invariant(format!(
                "cannot mark scans under shared node {explain_id}"
            ))
        })?;
        marked += mark_scans(child, decision)?;
    }

    Ok(marked)
}
