use crate::{
    catalog::TableInfo,
    error::InternalError,
    plan::{
        PlanContext, PlanType,
        join::JoinSpec,
        physical::{PhysicalOp, PhysicalPlan},
        property::{PhysicalProperty, StatsInfo},
    },
};
use std::sync::Arc;

impl PhysicalPlan {
    /// Merge join. Child requirements are attached by the caller through the
    /// children themselves; none are stored on the join.
    #[must_use]
    pub fn merge_join(
        ctx: &Arc<PlanContext>,
        spec: JoinSpec,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Self {
        Self::bind(ctx, PhysicalOp::MergeJoin(spec), stats, qb_offset, Vec::new())
    }

    /// Re-tag an index join as an index merge join under a fresh id.
    pub fn into_index_merge_join(self) -> Result<Self, InternalError> {
        self.retag_index_join(PlanType::IndexMergeJoin, PhysicalOp::IndexMergeJoin)
    }

    /// Re-tag an index join as an index hash join under a fresh id.
    pub fn into_index_hash_join(self) -> Result<Self, InternalError> {
        self.retag_index_join(PlanType::IndexHashJoin, PhysicalOp::IndexHashJoin)
    }

    fn retag_index_join(
        self,
        tp: PlanType,
        wrap: fn(JoinSpec) -> PhysicalOp,
    ) -> Result<Self, InternalError> {
        let &PhysicalOp::IndexJoin(spec) = &self.op else {
            return Err(InternalError::plan_invariant(format!(
                "cannot build {tp} from {}: not an index join",
                self.explain_id(),
            )));
        };

        Ok(Self {
            base: self.base.retag(tp),
            stats: self.stats,
            children_req_props: self.children_req_props,
            op: wrap(spec),
            children: self.children,
        })
    }

    /// Metadata listing; not estimated by the cost model.
    #[must_use]
    pub fn show(ctx: &Arc<PlanContext>) -> Self {
        Self::bind(ctx, PhysicalOp::Show, StatsInfo::placeholder(), 0, Vec::new())
    }

    /// DDL job listing; not estimated by the cost model.
    #[must_use]
    pub fn show_ddl_jobs(ctx: &Arc<PlanContext>) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::ShowDdlJobs,
            StatsInfo::placeholder(),
            0,
            Vec::new(),
        )
    }

    /// Table sample; not estimated by the cost model.
    #[must_use]
    pub fn table_sample(ctx: &Arc<PlanContext>, table: Arc<TableInfo>, qb_offset: usize) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::TableSample { table },
            StatsInfo::placeholder(),
            qb_offset,
            Vec::new(),
        )
    }

    /// Row lock for `SELECT ... FOR UPDATE`; always in the outermost block.
    #[must_use]
    pub fn lock(ctx: &Arc<PlanContext>, stats: StatsInfo, props: Vec<PhysicalProperty>) -> Self {
        Self::bind(ctx, PhysicalOp::Lock, stats, 0, props)
    }

    /// Foreign-key existence check run after a write; carries no estimate.
    #[must_use]
    pub fn foreign_key_check(
        ctx: &Arc<PlanContext>,
        table: Arc<TableInfo>,
        index_id: Option<i64>,
    ) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::ForeignKeyCheck { table, index_id },
            StatsInfo::default(),
            0,
            Vec::new(),
        )
    }

    #[must_use]
    pub fn foreign_key_cascade(ctx: &Arc<PlanContext>, table: Arc<TableInfo>) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::ForeignKeyCascade { table },
            StatsInfo::default(),
            0,
            Vec::new(),
        )
    }
}
