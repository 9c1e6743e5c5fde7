use super::*;
use crate::obs::PlanMetrics;

fn scan_modes(reader: &PhysicalPlan) -> Vec<ReadRequestMode> {
    let PhysicalOp::TableReader(reader) = reader.op() else {
        panic!("expected table reader, got {}", reader.tp());
    };

    reader
        .table_plans
        .table_scans()
        .map(TableScan::read_mode)
        .collect()
}

fn reader_mode(reader: &PhysicalPlan) -> ReadRequestMode {
    match reader.op() {
        PhysicalOp::TableReader(reader) => reader.read_mode(),
        _ => panic!("expected table reader, got {}", reader.tp()),
    }
}

// Build `[scan] -> [agg or topN]?` and route it under `policy`.
fn route_chain(keep_order: bool, policy: BatchCopPolicy, pre_reduce: bool) -> ReadRequestMode {
    let ctx = ctx_with_policy(policy);
    let scan = table_scan(&ctx, StoreEngine::Columnar, keep_order, 100.0);
    let plan = if pre_reduce {
        wrap(&ctx, top_n(), scan)
    } else {
        wrap(&ctx, PhysicalOp::Selection, scan)
    };

    let reader = PhysicalPlan::table_reader(&ctx, plan, StoreEngine::Columnar, stats(10.0), 1)
        .expect("reader");

    reader_mode(&reader)
}

#[test]
fn decision_table_matches_policy_levels() {
    use BatchCopPolicy::{AggOrTopN, Always, Never};
    use ReadRequestMode::{BatchedCoprocessor as Batch, RowCoprocessor as Row};

    let cases = [
        // (keep order, policy, has agg/topN, expected)
        (true, Never, false, Row),
        (true, AggOrTopN, true, Row),
        (true, Always, true, Row),
        (false, Never, false, Row),
        (false, Never, true, Row),
        (false, AggOrTopN, false, Row),
        (false, AggOrTopN, true, Batch),
        (false, Always, false, Batch),
        (false, Always, true, Batch),
    ];

    for (keep_order, policy, pre_reduce, expected) in cases {
        assert_eq!(
            route_chain(keep_order, policy, pre_reduce),
            expected,
            "keep_order={keep_order} policy={policy} pre_reduce={pre_reduce}",
        );
    }
}

#[test]
fn stream_and_hash_aggregation_count_as_pre_reduction() {
    for agg in [PhysicalOp::HashAgg, PhysicalOp::StreamAgg] {
        let ctx = ctx_with_policy(BatchCopPolicy::AggOrTopN);
        let plan = wrap(
            &ctx,
            agg,
            table_scan(&ctx, StoreEngine::Columnar, false, 100.0),
        );

        let decision = decide_route(&plan, StoreEngine::Columnar, BatchCopPolicy::AggOrTopN);

        assert_eq!(decision.mode, ReadRequestMode::BatchedCoprocessor);
    }
}

#[test]
fn non_columnar_engine_always_uses_row_coprocessor() {
    let ctx = ctx_with_policy(BatchCopPolicy::Always);
    let sender = PhysicalPlan::exchange_sender(&ctx, ExchangeType::PassThrough, stats(10.0))
        .with_children(vec![table_scan(&ctx, StoreEngine::RowStore, false, 10.0)]);

    let decision = decide_route(&sender, StoreEngine::RowStore, BatchCopPolicy::Always);

    assert_eq!(decision, RouteDecision::default());
}

#[test]
fn exchange_sender_root_forces_parallel_dataflow() {
    // keep order and policy 0 would both keep the row path otherwise
    let ctx = ctx_with_policy(BatchCopPolicy::Never);
    let join = PhysicalPlan::init(&ctx, hash_join(), stats(50.0), 1, vec![]).with_children(vec![
        table_scan(&ctx, StoreEngine::Columnar, true, 10.0),
        PhysicalPlan::exchange_receiver(&ctx, stats(20.0)),
    ]);
    let sender = PhysicalPlan::exchange_sender(&ctx, ExchangeType::Hash, stats(50.0))
        .with_children(vec![join]);

    let reader = PhysicalPlan::table_reader(&ctx, sender, StoreEngine::Columnar, stats(50.0), 1)
        .expect("dataflow fragments may branch");

    assert_eq!(reader_mode(&reader), ReadRequestMode::ParallelDataflow);
    assert_eq!(scan_modes(&reader), vec![ReadRequestMode::ParallelDataflow]);
}

#[test]
fn upgraded_mode_is_stamped_on_every_scan() {
    let ctx = ctx_with_policy(BatchCopPolicy::Always);
    let union = PhysicalPlan::init(&ctx, PhysicalOp::UnionAll, stats(30.0), 1, vec![])
        .with_children(vec![
            table_scan(&ctx, StoreEngine::Columnar, false, 10.0),
            table_scan(&ctx, StoreEngine::Columnar, false, 10.0),
            table_scan(&ctx, StoreEngine::Columnar, false, 10.0),
        ]);
    let sender = PhysicalPlan::exchange_sender(&ctx, ExchangeType::PassThrough, stats(30.0))
        .with_children(vec![union]);

    let reader = PhysicalPlan::table_reader(&ctx, sender, StoreEngine::Columnar, stats(30.0), 1)
        .expect("reader");

    assert_eq!(
        scan_modes(&reader),
        vec![ReadRequestMode::ParallelDataflow; 3]
    );
}

#[test]
fn batched_mode_is_stamped_on_scan_under_wrappers() {
    let ctx = ctx_with_policy(BatchCopPolicy::Always);
    let plan = wrap(
        &ctx,
        limit(),
        wrap(
            &ctx,
            PhysicalOp::Selection,
            table_scan(&ctx, StoreEngine::Columnar, false, 100.0),
        ),
    );

    let reader = PhysicalPlan::table_reader(&ctx, plan, StoreEngine::Columnar, stats(10.0), 1)
        .expect("reader");

    assert_eq!(scan_modes(&reader), vec![ReadRequestMode::BatchedCoprocessor]);
}

#[test]
fn row_coprocessor_leaves_scans_unmarked() {
    let ctx = ctx_with_policy(BatchCopPolicy::Never);
    let plan = table_scan(&ctx, StoreEngine::Columnar, false, 100.0);

    let reader = PhysicalPlan::table_reader(&ctx, plan, StoreEngine::Columnar, stats(10.0), 1)
        .expect("reader");

    assert_eq!(scan_modes(&reader), vec![ReadRequestMode::RowCoprocessor]);
}

#[test]
fn chain_without_table_scans_stays_row_coprocessor() {
    let ctx = ctx_with_policy(BatchCopPolicy::Always);
    let plan = wrap(&ctx, PhysicalOp::Selection, index_scan(&ctx, 10.0));

    let decision = decide_route(&plan, StoreEngine::Columnar, BatchCopPolicy::Always);

    assert_eq!(decision.mode, ReadRequestMode::RowCoprocessor);
    assert!(decision.scans_to_mark.is_empty());
}

#[test]
fn decision_names_every_scan_id() {
    let ctx = ctx_with_policy(BatchCopPolicy::Always);
    let left = table_scan(&ctx, StoreEngine::Columnar, false, 10.0);
    let right = table_scan(&ctx, StoreEngine::Columnar, false, 10.0);
    let expected = vec![left.id(), right.id()];
    let sender = PhysicalPlan::exchange_sender(&ctx, ExchangeType::Broadcast, stats(20.0))
        .with_children(vec![
            PhysicalPlan::init(&ctx, hash_join(), stats(20.0), 1, vec![])
                .with_children(vec![left, right]),
        ]);

    let decision = decide_route(&sender, StoreEngine::Columnar, BatchCopPolicy::Never);

    assert_eq!(decision.mode, ReadRequestMode::ParallelDataflow);
    assert_eq!(decision.scans_to_mark, expected);
}

#[test]
fn apply_rejects_shared_subtree() {
    let ctx = ctx_with_policy(BatchCopPolicy::Always);
    let scan = Arc::new(table_scan(&ctx, StoreEngine::Columnar, false, 10.0));
    let _held_elsewhere = Arc::clone(&scan);
    let mut plan = PhysicalPlan::init(&ctx, PhysicalOp::Selection, stats(5.0), 1, vec![])
        .with_shared_children(vec![scan]);

    let decision = decide_route(&plan, StoreEngine::Columnar, BatchCopPolicy::Always);
    let err = apply_route(&mut plan, &decision).expect_err("shared child cannot be marked");

    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert_eq!(err.origin, crate::error::ErrorOrigin::Route);
}

#[test]
fn routing_is_reported_to_metrics_sink() {
    let metrics = Arc::new(PlanMetrics::default());
    let ctx = crate::test_support::ctx_with_metrics(Arc::clone(&metrics));
    let plan = wrap(
        &ctx,
        PhysicalOp::HashAgg,
        table_scan(&ctx, StoreEngine::Columnar, false, 100.0),
    );

    // default session policy is level 1
    let _ = PhysicalPlan::table_reader(&ctx, plan, StoreEngine::Columnar, stats(1.0), 1)
        .expect("reader");
    let report = metrics.report();

    assert_eq!(report.reads_batch_cop, 1);
    assert_eq!(report.scans_marked, 1);
    assert_eq!(report.nodes_built, 3);
}

#[test]
fn reader_schema_is_table_plan_schema() {
    let ctx = ctx();
    let plan = table_scan(&ctx, StoreEngine::RowStore, false, 100.0);
    let expected = plan.schema().clone();

    let reader = PhysicalPlan::table_reader(&ctx, plan, StoreEngine::RowStore, stats(10.0), 1)
        .expect("reader");

    assert_eq!(reader.schema(), &expected);
    assert_eq!(reader.tp(), PlanType::TableReader);
    assert!(reader.children().is_empty());
}
