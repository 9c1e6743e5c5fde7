use super::*;
use crate::plan::{explain, render, render_chain};

#[test]
fn render_lists_reader_chain_below_reader() {
    let ctx = ctx_with_policy(BatchCopPolicy::AggOrTopN);
    let plan = wrap(
        &ctx,
        top_n(),
        table_scan(&ctx, StoreEngine::Columnar, false, 100.0),
    );
    let reader = PhysicalPlan::table_reader(&ctx, plan, StoreEngine::Columnar, stats(10.0), 1)
        .expect("reader");

    let text = render(&reader);
    let lines = text.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("TableReader_3\t10.00\tmode:batchCop, engine:columnar"));
    assert!(lines[1].starts_with("  TopN_2"));
    assert!(lines[2].starts_with("    TableScan_1"));
    assert!(lines[2].ends_with("mode:batchCop"));
}

#[test]
fn chain_renders_leaf_first() {
    let ctx = ctx();
    let plan = Arc::new(wrap(
        &ctx,
        limit(),
        table_scan(&ctx, StoreEngine::RowStore, false, 5.0),
    ));

    let chain = flatten_push_down_plan(&plan).expect("chain");

    assert_eq!(render_chain(&chain), "TableScan_1 -> Limit_2");
}

#[test]
fn explain_tree_serializes_to_json() {
    let ctx = ctx();
    let node = explain(&PhysicalPlan::show_ddl_jobs(&ctx));

    let json = serde_json::to_value(&node).expect("explain node serializes");

    assert_eq!(json["id"], "ShowDDLJobs_1");
    assert_eq!(json["est_rows"], 1.0);
    assert_eq!(json["children"].as_array().map(Vec::len), Some(0));
}
