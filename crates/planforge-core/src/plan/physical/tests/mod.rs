mod explain;
mod route;

use super::*;
use crate::{
    catalog::StoreEngine,
    config::BatchCopPolicy,
    error::ErrorClass,
    plan::{JoinSpec, JoinType, PlanType},
    test_support::{ctx, ctx_with_policy, index_scan, stats, table_scan, wrap},
};

fn top_n() -> PhysicalOp {
    PhysicalOp::TopN {
        by_items: Vec::new(),
        offset: 0,
        count: 10,
    }
}

fn limit() -> PhysicalOp {
    PhysicalOp::Limit {
        offset: 0,
        count: 10,
    }
}

fn hash_join() -> PhysicalOp {
    PhysicalOp::HashJoin(JoinSpec::new(JoinType::Inner, 1))
}

fn tags(chain: &PushDownChain) -> Vec<PlanType> {
    chain.iter().map(|plan| plan.tp()).collect()
}
