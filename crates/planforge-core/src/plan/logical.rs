//! Module: plan::logical
//! Responsibility: logical operator nodes and their identity binding.
//! Does not own: physical strategy choice or statistics.
//! Boundary: the optimizer builds these before physical realization.

use crate::{
    catalog::TableInfo,
    plan::{
        PlanContext, PlanId, PlanType,
        base::PlanBase,
        cte::CteDefinition,
        join::JoinType,
        schema::{Schema, SortItem},
    },
};
use std::sync::Arc;

///
/// LogicalOp
///
/// Closed set of logical operators with their operator-specific payload.
///

#[derive(Clone, Debug)]
pub enum LogicalOp {
    DataSource {
        table: Arc<TableInfo>,
    },
    Join {
        join_type: JoinType,
    },
    Aggregation,
    Selection,
    Projection,
    Sort {
        by_items: Vec<SortItem>,
    },
    TopN {
        by_items: Vec<SortItem>,
        offset: u64,
        count: u64,
    },
    Limit {
        offset: u64,
        count: u64,
    },
    Union,
    PartitionUnionAll,
    UnionScan,
    Apply {
        join_type: JoinType,
    },
    Window,
    MaxOneRow,
    TableDual {
        row_count: usize,
    },
    Cte {
        cte: Arc<CteDefinition>,
    },
    CteTable {
        cte: Arc<CteDefinition>,
    },
    Sequence,
    Show,
    ShowDdlJobs,
    Lock,
    Expand,
    MemTable {
        table: Arc<TableInfo>,
    },
    SingleGather {
        table: Arc<TableInfo>,
    },
    TableScan {
        table: Arc<TableInfo>,
    },
    IndexScan {
        table: Arc<TableInfo>,
        index_id: i64,
    },
}

impl LogicalOp {
    #[must_use]
    pub const fn plan_type(&self) -> PlanType {
        match self {
            Self::DataSource { .. } => PlanType::DataSource,
            Self::Join { .. } => PlanType::Join,
            Self::Aggregation => PlanType::Aggregation,
            Self::Selection => PlanType::Selection,
            Self::Projection => PlanType::Projection,
            Self::Sort { .. } => PlanType::Sort,
            Self::TopN { .. } => PlanType::TopN,
            Self::Limit { .. } => PlanType::Limit,
            Self::Union => PlanType::Union,
            Self::PartitionUnionAll => PlanType::PartitionUnion,
            Self::UnionScan => PlanType::UnionScan,
            Self::Apply { .. } => PlanType::Apply,
            Self::Window => PlanType::Window,
            Self::MaxOneRow => PlanType::MaxOneRow,
            Self::TableDual { .. } => PlanType::TableDual,
            Self::Cte { .. } => PlanType::Cte,
            Self::CteTable { .. } => PlanType::CteTable,
            Self::Sequence => PlanType::Sequence,
            Self::Show => PlanType::Show,
            Self::ShowDdlJobs => PlanType::ShowDdlJobs,
            Self::Lock => PlanType::Lock,
            Self::Expand => PlanType::Expand,
            Self::MemTable { .. } => PlanType::MemTableScan,
            Self::SingleGather { .. } => PlanType::SingleGather,
            Self::TableScan { .. } => PlanType::TableScan,
            Self::IndexScan { .. } => PlanType::IndexScan,
        }
    }

    // Statement-level operators always sit in the outermost query block.
    const fn is_statement_level(&self) -> bool {
        matches!(self, Self::Show | Self::ShowDdlJobs | Self::Lock)
    }
}

///
/// LogicalPlan
///
/// Logical node owning its children exclusively.
///

#[derive(Clone, Debug)]
pub struct LogicalPlan {
    base: PlanBase,
    op: LogicalOp,
    children: Vec<Self>,
}

impl LogicalPlan {
    /// Bind identity for one logical operator at `qb_offset`.
    #[must_use]
    pub fn init(ctx: &Arc<PlanContext>, op: LogicalOp, qb_offset: usize) -> Self {
        debug_assert!(
            !op.is_statement_level(),
            "statement-level logical operators use their dedicated constructors",
        );

        Self::bind(ctx, op, qb_offset)
    }

    #[must_use]
    pub fn show(ctx: &Arc<PlanContext>) -> Self {
        Self::bind(ctx, LogicalOp::Show, 0)
    }

    #[must_use]
    pub fn show_ddl_jobs(ctx: &Arc<PlanContext>) -> Self {
        Self::bind(ctx, LogicalOp::ShowDdlJobs, 0)
    }

    #[must_use]
    pub fn lock(ctx: &Arc<PlanContext>) -> Self {
        Self::bind(ctx, LogicalOp::Lock, 0)
    }

    fn bind(ctx: &Arc<PlanContext>, op: LogicalOp, qb_offset: usize) -> Self {
        Self {
            base: PlanBase::new(ctx, op.plan_type(), qb_offset),
            op,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.base.set_schema(schema);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
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
    pub const fn op(&self) -> &LogicalOp {
        &self.op
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}
