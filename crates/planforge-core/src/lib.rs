//! Physical plan construction and distributed read routing for a SQL
//! engine: node identity, statistics and property attachment, push-down
//! flattening, read-request routing, and point-lookup partition routing.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod obs;
pub mod plan;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only plan vocabulary.
/// No errors, sinks, codecs, or configuration loaders are re-exported here.
///

pub mod prelude {
    pub use crate::plan::{
        LogicalOp, LogicalPlan, PhysicalOp, PhysicalPlan, PlanContext, PlanId, PlanType,
        PushDownChain, ReadRequestMode, StatsInfo,
    };
}
