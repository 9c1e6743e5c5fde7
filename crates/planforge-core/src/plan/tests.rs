use crate::{
    catalog::{ColumnInfo, FieldType, TableInfo},
    config::SessionVars,
    obs::PlanMetrics,
    plan::{
        Column, LogicalOp, LogicalPlan, PhysicalOp, PhysicalPlan, PlanContext, PlanIdAllocator,
        PlanType, Schema, StatsInfo,
    },
    test_support::{ctx, ctx_with_metrics, orders_table},
};
use proptest::prelude::*;
use std::{collections::HashSet, sync::Arc};

#[test]
fn ids_are_strictly_increasing_within_one_allocator() {
    let ctx = ctx();
    let first = LogicalPlan::init(&ctx, LogicalOp::Selection, 1);
    let second = LogicalPlan::init(&ctx, LogicalOp::Projection, 1);
    let third = PhysicalPlan::init(&ctx, PhysicalOp::Selection, StatsInfo::new(5.0, 1), 1, vec![]);

    assert_eq!(first.id().get(), 1);
    assert!(second.id() > first.id());
    assert!(third.id() > second.id());
}

#[test]
fn concurrent_construction_never_duplicates_ids() {
    let ids = Arc::new(PlanIdAllocator::new());
    let per_thread = 200;
    let threads = 8;

    let issued = std::thread::scope(|scope| {
        let handles = (0..threads)
            .map(|_| {
                let ids = Arc::clone(&ids);
                scope.spawn(move || {
                    let ctx = PlanContext::new(SessionVars::default())
                        .with_id_allocator(ids)
                        .into_shared();
                    (0..per_thread)
                        .map(|_| LogicalPlan::init(&ctx, LogicalOp::Selection, 0).id())
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("worker thread panicked"))
            .collect::<Vec<_>>()
    });

    let unique = issued.iter().copied().collect::<HashSet<_>>();
    assert_eq!(unique.len(), threads * per_thread);
    assert_eq!(ids.last_issued(), (threads * per_thread) as u64);
}

#[test]
fn global_allocator_is_shared() {
    let a = PlanContext::new(SessionVars::default()).into_shared();
    let b = PlanContext::new(SessionVars::default()).into_shared();

    let first = LogicalPlan::init(&a, LogicalOp::Selection, 0).id();
    let second = LogicalPlan::init(&b, LogicalOp::Selection, 0).id();

    assert!(second > first);
}

#[test]
fn each_constructor_records_one_node() {
    let metrics = Arc::new(PlanMetrics::default());
    let ctx = ctx_with_metrics(Arc::clone(&metrics));

    let _ = PhysicalPlan::show(&ctx);
    let _ = LogicalPlan::show_ddl_jobs(&ctx);

    assert_eq!(metrics.report().nodes_built, 2);
}

#[test]
fn introspection_nodes_report_placeholder_row_count() {
    let ctx = ctx();

    assert_eq!(PhysicalPlan::show_ddl_jobs(&ctx).stats().row_count, 1.0);
    assert_eq!(PhysicalPlan::show(&ctx).stats().row_count, 1.0);
    assert_eq!(
        PhysicalPlan::table_sample(&ctx, orders_table(), 2).stats().row_count,
        1.0
    );
}

#[test]
fn statement_level_nodes_sit_in_outermost_block() {
    let ctx = ctx();

    assert_eq!(LogicalPlan::show(&ctx).base().qb_offset(), 0);
    assert_eq!(LogicalPlan::lock(&ctx).base().qb_offset(), 0);
    assert_eq!(PhysicalPlan::lock(&ctx, StatsInfo::new(3.0, 1), vec![]).base().qb_offset(), 0);
    assert_eq!(
        PhysicalPlan::foreign_key_check(&ctx, orders_table(), None)
            .base()
            .qb_offset(),
        0
    );
}

#[test]
fn foreign_key_nodes_carry_empty_stats() {
    let ctx = ctx();
    let check = PhysicalPlan::foreign_key_check(&ctx, orders_table(), Some(1));
    let cascade = PhysicalPlan::foreign_key_cascade(&ctx, orders_table());

    assert_eq!(check.stats(), &StatsInfo::default());
    assert_eq!(cascade.stats(), &StatsInfo::default());
    assert_eq!(cascade.tp(), PlanType::ForeignKeyCascade);
}

#[test]
fn logical_tags_follow_operator() {
    let ctx = ctx();
    let table = orders_table();

    let gather = LogicalPlan::init(&ctx, LogicalOp::SingleGather { table }, 2);
    let union = LogicalPlan::init(&ctx, LogicalOp::PartitionUnionAll, 2);

    assert_eq!(gather.tp(), PlanType::SingleGather);
    assert_eq!(union.tp(), PlanType::PartitionUnion);
    assert_eq!(gather.base().qb_offset(), 2);
}

#[test]
fn explain_id_joins_tag_and_id() {
    let ctx = ctx();
    let plan = LogicalPlan::init(&ctx, LogicalOp::Aggregation, 0);

    assert_eq!(plan.base().explain_id(), "Aggregation_1");
}

#[test]
fn logical_children_are_owned_in_order() {
    let ctx = ctx();
    let left = LogicalPlan::init(&ctx, LogicalOp::Selection, 1);
    let right = LogicalPlan::init(&ctx, LogicalOp::Projection, 1);
    let join = LogicalPlan::init(
        &ctx,
        LogicalOp::Join {
            join_type: crate::plan::JoinType::Inner,
        },
        1,
    )
    .with_children(vec![left, right]);

    let tags = join.children().iter().map(LogicalPlan::tp).collect::<Vec<_>>();
    assert_eq!(tags, vec![PlanType::Selection, PlanType::Projection]);
}

#[test]
fn stats_scale_to_row_count_scales_cardinality() {
    let stats = StatsInfo::new(100.0, 7).with_cardinality(vec![50.0, 10.0]);
    let scaled = stats.scale_to_row_count(400.0);

    assert_eq!(scaled.row_count, 400.0);
    assert_eq!(scaled.cardinality, vec![200.0, 40.0]);
    assert_eq!(scaled.stats_version, 7);
}

#[test]
fn stats_scale_from_zero_rows_sets_total() {
    let scaled = StatsInfo::new(0.0, 2).scale_to_row_count(12.0);

    assert_eq!(scaled.row_count, 12.0);
}

#[test]
fn virtual_column_flag_follows_catalog() {
    let table = TableInfo::new(
        3,
        "t",
        vec![
            ColumnInfo::new(1, "a", FieldType::Int),
            ColumnInfo::new(2, "b", FieldType::Int).virtual_over(vec![1]),
        ],
    );
    let schema = table
        .columns
        .iter()
        .zip(1..)
        .map(|(info, uid)| Column::from_info(uid, info))
        .collect::<Schema>();

    assert_eq!(schema[0].virtual_deps, None);
    assert_eq!(schema[1].virtual_deps, Some(vec![1]));
}

proptest! {
    #[test]
    fn allocator_issues_consecutive_ids(count in 1usize..64) {
        let ids = PlanIdAllocator::new();
        let issued = (0..count).map(|_| ids.next_id().get()).collect::<Vec<_>>();

        prop_assert_eq!(issued, (1..=count as u64).collect::<Vec<_>>());
        prop_assert_eq!(ids.last_issued(), count as u64);
    }
}
