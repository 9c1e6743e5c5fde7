//! Module: plan
//! Responsibility: plan node identity, logical and physical node
//! construction, read routing, partition routing, and EXPLAIN rendering.
//! Does not own: plan selection, cost estimation, or execution.
//! Boundary: every node is bound through a `PlanContext`; finished trees
//! are immutable and shared by `Arc`.

mod base;
mod context;
mod cte;
mod explain;
mod id;
mod join;
mod logical;
mod partition;
mod physical;
mod property;
mod schema;
mod tag;

#[cfg(test)]
mod tests;

pub use base::PlanBase;
pub use context::PlanContext;
pub use cte::CteDefinition;
pub use explain::{ExplainNode, explain, render, render_chain};
pub use id::{PlanId, PlanIdAllocator};
pub use join::{JoinSpec, JoinType};
pub use logical::{LogicalOp, LogicalPlan};
pub use partition::{LookupKeys, PartitionColumnPos, PartitionRouting};
pub use physical::{
    BatchPointGet, BatchPointGetKeys, CteRole, ExchangeType, IndexLookUpReader, IndexMergeReader,
    IndexReader, IndexScan, PhysicalCte, PhysicalOp, PhysicalPlan, PointGet, PointGetKey,
    PointGetSpec, PushDownChain, ReadRequestMode, RouteDecision, Shuffle, ShuffleSplitter,
    TableReader, TableScan, apply_route, decide_route, expand_virtual_columns,
    flatten_push_down_plan, flatten_tree_plan,
};
pub use property::{Distribution, PhysicalProperty, StatsInfo};
pub use schema::{Column, HandleCols, Schema, SortItem};
pub use tag::PlanType;
