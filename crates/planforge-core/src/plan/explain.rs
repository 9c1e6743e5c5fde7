//! Module: plan::explain
//! Responsibility: read-only diagnostic rendering of physical plans.
//! Does not own: plan construction or any plan mutation.
//! Boundary: consumes finished trees; output is for humans and tooling.

use crate::plan::{
    partition::PartitionRouting,
    physical::{CteRole, PhysicalOp, PhysicalPlan, PushDownChain},
};
use serde::Serialize;
use std::{fmt::Write as _, sync::Arc};

///
/// ExplainNode
///
/// One EXPLAIN row: `<tag>_<id>`, estimated rows, operator info, and the
/// rows below it. Reader nodes list their pushed-down plans as children.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplainNode {
    pub id: String,
    pub est_rows: f64,
    pub info: String,
    pub children: Vec<Self>,
}

/// Build the explain tree for `plan`.
#[must_use]
pub fn explain(plan: &PhysicalPlan) -> ExplainNode {
    let mut children = embedded_plans(plan)
        .into_iter()
        .map(|child| explain(child))
        .collect::<Vec<_>>();
    children.extend(plan.children().iter().map(|child| explain(child)));

    ExplainNode {
        id: plan.explain_id(),
        est_rows: plan.stats().row_count,
        info: operator_info(plan.op()),
        children,
    }
}

/// Render `plan` as indented text, one operator per line.
#[must_use]
pub fn render(plan: &PhysicalPlan) -> String {
    fn write_node(out: &mut String, node: &ExplainNode, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{}\t{:.2}", node.id, node.est_rows);
        if !node.info.is_empty() {
            let _ = write!(out, "\t{}", node.info);
        }
        out.push('\n');

        for child in &node.children {
            write_node(out, child, depth + 1);
        }
    }

    let mut out = String::new();
    write_node(&mut out, &explain(plan), 0);

    out
}

/// Render a push-down chain leaf first, e.g. `TableScan_1 -> TopN_2`.
#[must_use]
pub fn render_chain(chain: &PushDownChain) -> String {
    chain
        .iter()
        .map(|plan| plan.explain_id())
        .collect::<Vec<_>>()
        .join(" -> ")
}

// Plans held in operator payloads rather than as children.
fn embedded_plans(plan: &PhysicalPlan) -> Vec<&Arc<PhysicalPlan>> {
    match plan.op() {
        PhysicalOp::TableReader(reader) => vec![&reader.table_plan],
        PhysicalOp::IndexReader(reader) => vec![&reader.index_plan],
        PhysicalOp::IndexLookUpReader(reader) => vec![&reader.index_plan, &reader.table_plan],
        PhysicalOp::IndexMergeReader(reader) => reader
            .partial_plans
            .iter()
            .chain(reader.table_plans.iter())
            .filter_map(PushDownChain::root)
            .collect(),
        PhysicalOp::Cte(cte) => match &cte.role {
            CteRole::Producer { seed, recursive } => {
                std::iter::once(seed).chain(recursive.iter()).collect()
            }
            CteRole::Consumer => Vec::new(),
        },
        PhysicalOp::Shuffle(shuffle) => shuffle.tails.iter().collect(),
        _ => Vec::new(),
    }
}

fn routing_info(routing: &PartitionRouting) -> String {
    match routing {
        PartitionRouting::Unavailable => "partition:all".to_string(),
        PartitionRouting::Resolved(ids) => {
            let ids = ids.iter().map(i64::to_string).collect::<Vec<_>>();
            format!("partition:[{}]", ids.join(","))
        }
    }
}

fn operator_info(op: &PhysicalOp) -> String {
    match op {
        PhysicalOp::TableScan(scan) => format!(
            "table:{}, keep order:{}, mode:{}",
            scan.table.name,
            scan.keep_order,
            scan.read_mode(),
        ),
        PhysicalOp::IndexScan(scan) => format!(
            "table:{}, index:{}, keep order:{}",
            scan.table.name, scan.index_id, scan.keep_order,
        ),
        PhysicalOp::TableReader(reader) => format!(
            "mode:{}, engine:{}",
            reader.read_mode(),
            reader.store_engine
        ),
        PhysicalOp::IndexLookUpReader(reader) => format!("keep order:{}", reader.keep_order),
        PhysicalOp::IndexMergeReader(reader) => format!(
            "partials:{}, keep order:{}",
            reader.partial_plans.len(),
            reader.keep_order,
        ),
        PhysicalOp::HashJoin(spec)
        | PhysicalOp::MergeJoin(spec)
        | PhysicalOp::IndexJoin(spec)
        | PhysicalOp::IndexMergeJoin(spec)
        | PhysicalOp::IndexHashJoin(spec)
        | PhysicalOp::Apply(spec) => {
            format!("{}, inner:{}", spec.join_type, spec.inner_child_idx)
        }
        PhysicalOp::Limit { offset, count } | PhysicalOp::TopN { offset, count, .. } => {
            format!("offset:{offset}, count:{count}")
        }
        PhysicalOp::ExchangeSender { exchange_type } => format!("type:{exchange_type}"),
        PhysicalOp::Shuffle(shuffle) => format!("concurrency:{}", shuffle.concurrency),
        PhysicalOp::ShuffleReceiverStub { source_index } => format!("source:{source_index}"),
        PhysicalOp::Cte(cte) => format!(
            "cte:{}, {}",
            cte.cte.name,
            if cte.is_producer() { "producer" } else { "consumer" },
        ),
        PhysicalOp::CteTable { cte } => format!("cte:{}", cte.name),
        PhysicalOp::PointGet(point_get) => format!(
            "table:{}, {}",
            point_get.table.name,
            routing_info(point_get.partition_routing()),
        ),
        PhysicalOp::BatchPointGet(batch) => format!(
            "table:{}, rows:{}, {}",
            batch.table.name,
            batch.keys.len(),
            routing_info(batch.partition_routing()),
        ),
        PhysicalOp::TableSample { table }
        | PhysicalOp::MemTable { table }
        | PhysicalOp::ForeignKeyCascade { table }
        | PhysicalOp::ForeignKeyCheck { table, .. } => format!("table:{}", table.name),
        _ => String::new(),
    }
}
