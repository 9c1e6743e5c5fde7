//! Module: plan::physical
//! Responsibility: physical operator nodes, statistics and required child
//! property attachment, and the per-variant construction contracts.
//! Does not own: cost estimation, property derivation, or execution.
//! Boundary: constructors return finished nodes; staged fields (read mode,
//! partition ids) are written before a constructor returns.

mod flatten;
mod operator;
mod point_get;
mod reader;
mod route;
mod scan;
mod structural;

#[cfg(test)]
mod tests;

pub use flatten::{PushDownChain, flatten_push_down_plan, flatten_tree_plan};
pub use point_get::{
    BatchPointGet, BatchPointGetKeys, PointGet, PointGetKey, PointGetSpec, expand_virtual_columns,
};
pub use reader::{IndexLookUpReader, IndexMergeReader, IndexReader, TableReader};
pub use route::{ReadRequestMode, RouteDecision, apply_route, decide_route};
pub use scan::{IndexScan, TableScan};
pub use structural::{CteRole, ExchangeType, PhysicalCte, Shuffle, ShuffleSplitter};

use crate::{
    catalog::TableInfo,
    plan::{
        PlanContext, PlanId, PlanType,
        base::PlanBase,
        cte::CteDefinition,
        join::JoinSpec,
        property::{PhysicalProperty, StatsInfo},
        schema::{Schema, SortItem},
    },
};
use std::sync::Arc;

///
/// PhysicalOp
///
/// Closed set of physical operators with their operator-specific payload.
///

#[derive(Clone, Debug)]
pub enum PhysicalOp {
    TableScan(TableScan),
    IndexScan(IndexScan),
    HashJoin(JoinSpec),
    MergeJoin(JoinSpec),
    IndexJoin(JoinSpec),
    IndexMergeJoin(JoinSpec),
    IndexHashJoin(JoinSpec),
    HashAgg,
    StreamAgg,
    TableReader(TableReader),
    IndexReader(IndexReader),
    IndexLookUpReader(IndexLookUpReader),
    IndexMergeReader(IndexMergeReader),
    TableSample {
        table: Arc<TableInfo>,
    },
    ExchangeSender {
        exchange_type: ExchangeType,
    },
    ExchangeReceiver,
    Shuffle(Shuffle),
    ShuffleReceiverStub {
        source_index: usize,
    },
    Sequence,
    Cte(PhysicalCte),
    CteTable {
        cte: Arc<CteDefinition>,
    },
    Apply(JoinSpec),
    UnionScan,
    Limit {
        offset: u64,
        count: u64,
    },
    TopN {
        by_items: Vec<SortItem>,
        offset: u64,
        count: u64,
    },
    Sort {
        by_items: Vec<SortItem>,
    },
    NominalSort {
        by_items: Vec<SortItem>,
    },
    MaxOneRow,
    Selection,
    Projection,
    UnionAll,
    TableDual {
        row_count: usize,
    },
    Window,
    Lock,
    MemTable {
        table: Arc<TableInfo>,
    },
    Show,
    ShowDdlJobs,
    PointGet(PointGet),
    BatchPointGet(BatchPointGet),
    ForeignKeyCheck {
        table: Arc<TableInfo>,
        index_id: Option<i64>,
    },
    ForeignKeyCascade {
        table: Arc<TableInfo>,
    },
}

impl PhysicalOp {
    #[must_use]
    pub const fn plan_type(&self) -> PlanType {
        match self {
            Self::TableScan(_) => PlanType::TableScan,
            Self::IndexScan(_) => PlanType::IndexScan,
            Self::HashJoin(_) => PlanType::HashJoin,
            Self::MergeJoin(_) => PlanType::MergeJoin,
            Self::IndexJoin(_) => PlanType::IndexJoin,
            Self::IndexMergeJoin(_) => PlanType::IndexMergeJoin,
            Self::IndexHashJoin(_) => PlanType::IndexHashJoin,
            Self::HashAgg => PlanType::HashAgg,
            Self::StreamAgg => PlanType::StreamAgg,
            Self::TableReader(_) => PlanType::TableReader,
            Self::IndexReader(_) => PlanType::IndexReader,
            Self::IndexLookUpReader(_) => PlanType::IndexLookUp,
            Self::IndexMergeReader(_) => PlanType::IndexMerge,
            Self::TableSample { .. } => PlanType::TableSample,
            Self::ExchangeSender { .. } => PlanType::ExchangeSender,
            Self::ExchangeReceiver => PlanType::ExchangeReceiver,
            Self::Shuffle(_) => PlanType::Shuffle,
            Self::ShuffleReceiverStub { .. } => PlanType::ShuffleReceiver,
            Self::Sequence => PlanType::Sequence,
            Self::Cte(_) => PlanType::Cte,
            Self::CteTable { .. } => PlanType::CteTable,
            Self::Apply(_) => PlanType::Apply,
            Self::UnionScan => PlanType::UnionScan,
            Self::Limit { .. } => PlanType::Limit,
            Self::TopN { .. } => PlanType::TopN,
            Self::Sort { .. } | Self::NominalSort { .. } => PlanType::Sort,
            Self::MaxOneRow => PlanType::MaxOneRow,
            Self::Selection => PlanType::Selection,
            Self::Projection => PlanType::Projection,
            Self::UnionAll => PlanType::Union,
            Self::TableDual { .. } => PlanType::TableDual,
            Self::Window => PlanType::Window,
            Self::Lock => PlanType::Lock,
            Self::MemTable { .. } => PlanType::MemTableScan,
            Self::Show => PlanType::Show,
            Self::ShowDdlJobs => PlanType::ShowDdlJobs,
            Self::PointGet(_) => PlanType::PointGet,
            Self::BatchPointGet(_) => PlanType::BatchPointGet,
            Self::ForeignKeyCheck { .. } => PlanType::ForeignKeyCheck,
            Self::ForeignKeyCascade { .. } => PlanType::ForeignKeyCascade,
        }
    }

    // Operators with dedicated constructors that fix stats, offset or
    // properties, or derive schema from their inputs.
    const fn has_dedicated_constructor(&self) -> bool {
        matches!(
            self,
            Self::TableScan(_)
                | Self::IndexScan(_)
                | Self::MergeJoin(_)
                | Self::IndexMergeJoin(_)
                | Self::IndexHashJoin(_)
                | Self::TableReader(_)
                | Self::IndexReader(_)
                | Self::IndexLookUpReader(_)
                | Self::IndexMergeReader(_)
                | Self::TableSample { .. }
                | Self::ExchangeSender { .. }
                | Self::ExchangeReceiver
                | Self::Shuffle(_)
                | Self::ShuffleReceiverStub { .. }
                | Self::Sequence
                | Self::Cte(_)
                | Self::CteTable { .. }
                | Self::Lock
                | Self::Show
                | Self::ShowDdlJobs
                | Self::PointGet(_)
                | Self::BatchPointGet(_)
                | Self::ForeignKeyCheck { .. }
                | Self::ForeignKeyCascade { .. }
        )
    }

    /// Table-scan payload, if this is a table scan.
    #[must_use]
    pub const fn as_table_scan(&self) -> Option<&TableScan> {
        match self {
            Self::TableScan(scan) => Some(scan),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_index_scan(&self) -> Option<&IndexScan> {
        match self {
            Self::IndexScan(scan) => Some(scan),
            _ => None,
        }
    }
}

///
/// PhysicalPlan
///
/// Physical node: identity, attached statistics, required child
/// properties (one per child), operator payload, and shared children.
///

#[derive(Clone, Debug)]
pub struct PhysicalPlan {
    base: PlanBase,
    stats: StatsInfo,
    children_req_props: Vec<PhysicalProperty>,
    op: PhysicalOp,
    children: Vec<Arc<Self>>,
}

impl PhysicalPlan {
    /// Bind identity, statistics and required child properties for an
    /// operator without a dedicated constructor.
    #[must_use]
    pub fn init(
        ctx: &Arc<PlanContext>,
        op: PhysicalOp,
        stats: StatsInfo,
        qb_offset: usize,
        props: Vec<PhysicalProperty>,
    ) -> Self {
        debug_assert!(
            !op.has_dedicated_constructor(),
            "{} must be built through its dedicated constructor",
            op.plan_type(),
        );

        Self::bind(ctx, op, stats, qb_offset, props)
    }

    pub(crate) fn bind(
        ctx: &Arc<PlanContext>,
        op: PhysicalOp,
        stats: StatsInfo,
        qb_offset: usize,
        props: Vec<PhysicalProperty>,
    ) -> Self {
        Self {
            base: PlanBase::new(ctx, op.plan_type(), qb_offset),
            stats,
            children_req_props: props,
            op,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.base.set_schema(schema);
        self
    }

    /// Attach children. Each child is owned by this node alone.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    /// Attach children that are already shared.
    #[must_use]
    pub fn with_shared_children(mut self, children: Vec<Arc<Self>>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub const fn base(&self) -> &PlanBase {
        &self.base
    }

    #[must_use]
    pub const fn id(&self) -> PlanId {
        self.base.id()
    }

    #[must_use]
    pub const fn tp(&self) -> PlanType {
        self.base.tp()
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        self.base.schema()
    }

    #[must_use]
    pub const fn stats(&self) -> &StatsInfo {
        &self.stats
    }

    #[must_use]
    pub fn children_req_props(&self) -> &[PhysicalProperty] {
        &self.children_req_props
    }

    #[must_use]
    pub const fn op(&self) -> &PhysicalOp {
        &self.op
    }

    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    #[must_use]
    pub fn explain_id(&self) -> String {
        self.base.explain_id()
    }

    pub(crate) const fn op_mut(&mut self) -> &mut PhysicalOp {
        &mut self.op
    }

    pub(crate) const fn children_mut(&mut self) -> &mut Vec<Arc<Self>> {
        &mut self.children
    }

    pub(crate) fn set_schema(&mut self, schema: Schema) {
        self.base.set_schema(schema);
    }
}
