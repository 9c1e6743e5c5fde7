//! Module: plan::physical::reader
//! Responsibility: storage-reading wrapper nodes and their pushed-down
//! chains (table, index, index lookup, index merge).
//! Does not own: the routing decision itself (see `route`).
//! Boundary: each reader flattens its access paths exactly once, inside its
//! constructor, and derives schema and statistics from the authoritative path.

use crate::{
    catalog::StoreEngine,
    error::InternalError,
    obs::MetricsEvent,
    plan::{
        PlanContext,
        physical::{
            PhysicalOp, PhysicalPlan, PushDownChain, ReadRequestMode, apply_route, decide_route,
            flatten_push_down_plan, flatten_tree_plan,
        },
        property::StatsInfo,
        schema::{HandleCols, SortItem},
    },
};
use std::sync::Arc;

///
/// TableReader
///

#[derive(Clone, Debug)]
pub struct TableReader {
    pub table_plan: Arc<PhysicalPlan>,
    pub table_plans: PushDownChain,
    pub store_engine: StoreEngine,
    read_mode: ReadRequestMode,
}

impl TableReader {
    #[must_use]
    pub const fn read_mode(&self) -> ReadRequestMode {
        self.read_mode
    }
}

///
/// IndexReader
///

#[derive(Clone, Debug)]
pub struct IndexReader {
    pub index_plan: Arc<PhysicalPlan>,
    pub index_plans: PushDownChain,
}

///
/// IndexLookUpReader
///
/// Index-filtering chain plus row-fetching chain, flattened independently.
///

#[derive(Clone, Debug)]
pub struct IndexLookUpReader {
    pub index_plan: Arc<PhysicalPlan>,
    pub table_plan: Arc<PhysicalPlan>,
    pub index_plans: PushDownChain,
    pub table_plans: PushDownChain,
    pub handle_cols: HandleCols,
    pub keep_order: bool,
}

///
/// IndexMergeReader
///
/// Several partial index-only chains, optionally followed by one unified
/// row-fetching chain.
///

#[derive(Clone, Debug)]
pub struct IndexMergeReader {
    pub partial_plans: Vec<PushDownChain>,
    pub table_plans: Option<PushDownChain>,
    pub handle_cols: Option<HandleCols>,
    pub keep_order: bool,
    pub by_items: Vec<SortItem>,
}

impl PhysicalPlan {
    /// Build a table reader, routing its subtree and stamping the chosen
    /// mode onto every table scan before the subtree is shared.
    pub fn table_reader(
        ctx: &Arc<PlanContext>,
        mut table_plan: Self,
        store_engine: StoreEngine,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Result<Self, InternalError> {
        let decision = decide_route(&table_plan, store_engine, ctx.session().allow_batch_cop);
        let marked = apply_route(&mut table_plan, &decision)?;

        let schema = table_plan.schema().clone();
        let is_fragment = matches!(table_plan.op(), PhysicalOp::ExchangeSender { .. });
        let table_plan = Arc::new(table_plan);
        let table_plans = if is_fragment {
            flatten_tree_plan(&table_plan)
        } else {
            flatten_push_down_plan(&table_plan)?
        };

        let reader = TableReader {
            table_plan,
            table_plans,
            store_engine,
            read_mode: decision.mode,
        };
        let plan = Self::bind(
            ctx,
            PhysicalOp::TableReader(reader),
            stats,
            qb_offset,
            Vec::new(),
        )
        .with_schema(schema);

        tracing::debug!(
            reader = %plan.explain_id(),
            mode = %decision.mode,
            store_engine = %store_engine,
            marked_scans = marked,
            "routed table reader",
        );
        ctx.record(MetricsEvent::ReadRouted {
            mode: decision.mode,
            marked_scans: marked,
        });

        Ok(plan)
    }

    pub fn index_reader(
        ctx: &Arc<PlanContext>,
        index_plan: Self,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Result<Self, InternalError> {
        let schema = index_plan.schema().clone();
        let index_plan = Arc::new(index_plan);
        let index_plans = flatten_push_down_plan(&index_plan)?;
        require_index_scan_head(&index_plans, "index reader")?;

        let reader = IndexReader {
            index_plan,
            index_plans,
        };

        Ok(Self::bind(
            ctx,
            PhysicalOp::IndexReader(reader),
            stats,
            qb_offset,
            Vec::new(),
        )
        .with_schema(schema))
    }

    /// Schema and handle columns come from the row-fetching chain.
    pub fn index_lookup_reader(
        ctx: &Arc<PlanContext>,
        index_plan: Self,
        table_plan: Self,
        keep_order: bool,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Result<Self, InternalError> {
        let schema = table_plan.schema().clone();
        let index_plan = Arc::new(index_plan);
        let table_plan = Arc::new(table_plan);
        let index_plans = flatten_push_down_plan(&index_plan)?;
        let table_plans = flatten_push_down_plan(&table_plan)?;

        require_index_scan_head(&index_plans, "index lookup reader")?;
        let handle_cols = table_scan_handle_cols(&table_plans, "index lookup reader")?;

        let reader = IndexLookUpReader {
            index_plan,
            table_plan,
            index_plans,
            table_plans,
            handle_cols,
            keep_order,
        };

        Ok(Self::bind(
            ctx,
            PhysicalOp::IndexLookUpReader(reader),
            stats,
            qb_offset,
            Vec::new(),
        )
        .with_schema(schema))
    }

    /// Build an index merge reader.
    ///
    /// With a unified table chain, statistics and schema come from it.
    /// Without one, statistics are the first partial chain's estimate scaled
    /// to the sum of all partial row counts (keeping the first partial's
    /// stats version), and schema comes from the first partial chain's head.
    pub fn index_merge_reader(
        ctx: &Arc<PlanContext>,
        partial_plans: Vec<Self>,
        table_plan: Option<Self>,
        keep_order: bool,
        qb_offset: usize,
    ) -> Result<Self, InternalError> {
        if partial_plans.is_empty() && table_plan.is_none() {
            return Err(InternalError::plan_invariant(
                "index merge reader has neither partial plans nor a table plan",
            ));
        }

        let partial_chains = partial_plans
            .into_iter()
            .map(|plan| flatten_push_down_plan(&Arc::new(plan)))
            .collect::<Result<Vec<_>, _>>()?;
        let heads = partial_chains
            .iter()
            .map(|chain| scan_head(chain, "index merge partial plan"))
            .collect::<Result<Vec<_>, _>>()?;

        let (stats, schema, table_plans, handle_cols) = match table_plan {
            Some(table_plan) => {
                let stats = table_plan.stats().clone();
                let schema = table_plan.schema().clone();
                let chain = flatten_push_down_plan(&Arc::new(table_plan))?;
                let handle_cols = table_scan_handle_cols(&chain, "index merge reader")?;

                (stats, schema, Some(chain), Some(handle_cols))
            }
            None => {
                // Non-empty: checked above.
                let Some(first) = heads.first() else {
                    return Err(InternalError::plan_invariant(
                        "index merge reader has no partial plans",
                    ));
                };
                let total = partial_chains
                    .iter()
                    .filter_map(PushDownChain::root)
                    .map(|root| root.stats().row_count)
                    .sum::<f64>();
                let first_stats = partial_chains
                    .first()
                    .and_then(PushDownChain::root)
                    .map(|root| root.stats().clone())
                    .unwrap_or_default();
                let mut stats = first_stats.scale_to_row_count(total);
                stats.stats_version = first_stats.stats_version;

                let schema = match first.op() {
                    PhysicalOp::IndexScan(scan) => scan.data_source_schema.clone(),
                    _ => first.schema().clone(),
                };

                (stats, schema, None, None)
            }
        };

        let by_items = if keep_order {
            heads
                .first()
                .map(|head| match head.op() {
                    PhysicalOp::TableScan(scan) => scan.by_items.clone(),
                    PhysicalOp::IndexScan(scan) => scan.by_items.clone(),
                    _ => Vec::new(),
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let reader = IndexMergeReader {
            partial_plans: partial_chains,
            table_plans,
            handle_cols,
            keep_order,
            by_items,
        };

        Ok(Self::bind(
            ctx,
            PhysicalOp::IndexMergeReader(reader),
            stats,
            qb_offset,
            Vec::new(),
        )
        .with_schema(schema))
    }
}

// Head of a composite reader chain; must be a table or index scan.
fn scan_head<'a>(
    chain: &'a PushDownChain,
    what: &str,
) -> Result<&'a Arc<PhysicalPlan>, InternalError> {
    match chain.head() {
        Some(head)
            if matches!(
                head.op(),
                PhysicalOp::TableScan(_) | PhysicalOp::IndexScan(_)
            ) =>
        {
            Ok(head)
        }
        Some(head) => Err(InternalError::plan_invariant(format!(
            "{what} is headed by {} instead of a scan",
            head.explain_id(),
        ))),
        None => Err(InternalError::plan_invariant(format!("{what} is empty"))),
    }
}

fn require_index_scan_head(chain: &PushDownChain, what: &str) -> Result<(), InternalError> {
    let head = scan_head(chain, what)?;
    if head.op().as_index_scan().is_none() {
        return Err(InternalError::plan_invariant(format!(
            "{what} index chain is headed by {} instead of an index scan",
            head.explain_id(),
        )));
    }

    Ok(())
}

fn table_scan_handle_cols(chain: &PushDownChain, what: &str) -> Result<HandleCols, InternalError> {
    let head = scan_head(chain, what)?;

    head.op()
        .as_table_scan()
        .map(|scan| scan.handle_cols.clone())
        .ok_or_else(|| {
            InternalError::plan_invariant(format!(
                "{what} table chain is headed by {} instead of a table scan",
                head.explain_id(),
            ))
        })
}
