//! Shared fixtures for plan construction tests.

use crate::{
    catalog::{
        ColumnInfo, EXTRA_HANDLE_ID, FieldType, IndexInfo, PartitionDefinition, PartitionExpr,
        PartitionInfo, StoreEngine, TableInfo,
    },
    config::{BatchCopPolicy, SessionVars},
    obs::PlanMetrics,
    plan::{
        Column, HandleCols, IndexScan, PhysicalOp, PhysicalPlan, PlanContext, PlanIdAllocator,
        Schema, SortItem, StatsInfo, TableScan,
    },
};
use std::sync::Arc;

/// Context with a private allocator, so ids start at 1.
pub(crate) fn ctx_with_policy(policy: BatchCopPolicy) -> Arc<PlanContext> {
    PlanContext::new(SessionVars::with_batch_cop(policy))
        .with_id_allocator(Arc::new(PlanIdAllocator::new()))
        .into_shared()
}

pub(crate) fn ctx() -> Arc<PlanContext> {
    ctx_with_policy(BatchCopPolicy::default())
}

pub(crate) fn ctx_with_metrics(metrics: Arc<PlanMetrics>) -> Arc<PlanContext> {
    PlanContext::new(SessionVars::default())
        .with_id_allocator(Arc::new(PlanIdAllocator::new()))
        .with_metrics_sink(metrics)
        .into_shared()
}

/// `orders(id int, region int, amount float)` with an index on `region`.
pub(crate) fn orders_table() -> Arc<TableInfo> {
    Arc::new(
        TableInfo::new(
            10,
            "orders",
            vec![
                ColumnInfo::new(1, "id", FieldType::Int),
                ColumnInfo::new(2, "region", FieldType::Int),
                ColumnInfo::new(3, "amount", FieldType::Float),
            ],
        )
        .with_index(IndexInfo {
            id: 1,
            name: "idx_region".to_string(),
            columns: vec![2],
            unique: false,
            global: false,
        }),
    )
}

/// `orders` hash-partitioned four ways on `id` (physical ids 100..=103).
pub(crate) fn partitioned_orders() -> Arc<TableInfo> {
    let table = Arc::unwrap_or_clone(orders_table());

    Arc::new(table.with_partition(PartitionInfo::new(
        PartitionExpr::Hash,
        1,
        (0..4)
            .map(|i| PartitionDefinition::new(100 + i, format!("p{i}")))
            .collect(),
    )))
}

pub(crate) fn table_schema(table: &TableInfo) -> Schema {
    table
        .columns
        .iter()
        .zip(1..)
        .map(|(info, uid)| Column::from_info(uid, info))
        .collect()
}

pub(crate) fn handle_column() -> Column {
    Column::new(99, EXTRA_HANDLE_ID, "_row_id", FieldType::Int)
}

pub(crate) fn stats(row_count: f64) -> StatsInfo {
    StatsInfo::new(row_count, 1)
}

pub(crate) fn table_scan(
    ctx: &Arc<PlanContext>,
    engine: StoreEngine,
    keep_order: bool,
    row_count: f64,
) -> PhysicalPlan {
    let table = orders_table();
    let schema = table_schema(&table);
    let mut scan = TableScan::new(table, engine, HandleCols::Int(handle_column()));
    if keep_order {
        scan = scan.keeping_order(vec![SortItem::asc(schema[0].clone())], false);
    }

    PhysicalPlan::table_scan(ctx, scan, schema, stats(row_count), 1)
}

pub(crate) fn index_scan(ctx: &Arc<PlanContext>, row_count: f64) -> PhysicalPlan {
    let table = orders_table();
    let data_source_schema = table_schema(&table);
    let index_schema = Schema::new(vec![data_source_schema[1].clone()]);
    let scan = IndexScan::new(table, 1, data_source_schema);

    PhysicalPlan::index_scan(ctx, scan, index_schema, stats(row_count), 1)
}

/// Single-child wrapper of `op` over `child`.
pub(crate) fn wrap(ctx: &Arc<PlanContext>, op: PhysicalOp, child: PhysicalPlan) -> PhysicalPlan {
    let schema = child.schema().clone();
    let row_count = child.stats().row_count;

    PhysicalPlan::init(ctx, op, stats(row_count), 1, Vec::new())
        .with_schema(schema)
        .with_children(vec![child])
}
