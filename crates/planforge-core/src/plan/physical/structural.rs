//! Module: plan::physical::structural
//! Responsibility: nodes whose construction only records structure: CTE
//! producers and consumers, sequences, exchange endpoints, and shuffles.
//! Does not own: redistribution schemes or evaluation order at runtime.
//! Boundary: the execution layer interprets the recorded structure.

use crate::{
    error::InternalError,
    plan::{
        PlanContext,
        cte::CteDefinition,
        physical::{PhysicalOp, PhysicalPlan},
        property::{PhysicalProperty, StatsInfo},
    },
};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// ExchangeType
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub enum ExchangeType {
    #[default]
    PassThrough,
    Broadcast,
    Hash,
}

impl fmt::Display for ExchangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PassThrough => "PassThrough",
            Self::Broadcast => "Broadcast",
            Self::Hash => "HashPartition",
        };
        write!(f, "{label}")
    }
}

///
/// CteRole
///
/// A CTE definition has exactly one producer, which owns the materializing
/// subplans; every other reference is a consumer of the stored result.
///

#[derive(Clone, Debug)]
pub enum CteRole {
    Producer {
        seed: Arc<PhysicalPlan>,
        recursive: Option<Arc<PhysicalPlan>>,
    },
    Consumer,
}

///
/// PhysicalCte
///

#[derive(Clone, Debug)]
pub struct PhysicalCte {
    pub cte: Arc<CteDefinition>,
    pub role: CteRole,
}

impl PhysicalCte {
    #[must_use]
    pub const fn is_producer(&self) -> bool {
        matches!(self.role, CteRole::Producer { .. })
    }
}

///
/// ShuffleSplitter
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ShuffleSplitter {
    /// Hash rows on the listed column unique ids, one list per data source.
    Hash(Vec<Vec<i64>>),
}

///
/// Shuffle
///
/// Parallel re-grouping ahead of an operator that needs same-key rows on
/// one worker. Each tail reads from a receiver stub that execution wiring
/// replaces with the data source at the same position.
///

#[derive(Clone, Debug)]
pub struct Shuffle {
    pub concurrency: usize,
    pub splitter: ShuffleSplitter,
    pub tails: Vec<Arc<PhysicalPlan>>,
    pub data_sources: Vec<Arc<PhysicalPlan>>,
}

impl PhysicalPlan {
    /// CTE producer owning its seed and optional recursive subplans.
    #[must_use]
    pub fn cte_producer(
        ctx: &Arc<PlanContext>,
        cte: Arc<CteDefinition>,
        seed: Self,
        recursive: Option<Self>,
        stats: StatsInfo,
    ) -> Self {
        let role = CteRole::Producer {
            seed: Arc::new(seed),
            recursive: recursive.map(Arc::new),
        };

        Self::bind(
            ctx,
            PhysicalOp::Cte(PhysicalCte { cte, role }),
            stats,
            0,
            Vec::new(),
        )
    }

    /// Reference to a CTE materialized by its producer.
    #[must_use]
    pub fn cte_consumer(ctx: &Arc<PlanContext>, cte: Arc<CteDefinition>, stats: StatsInfo) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::Cte(PhysicalCte {
                cte,
                role: CteRole::Consumer,
            }),
            stats,
            0,
            Vec::new(),
        )
    }

    /// Working table read by the recursive part of a recursive CTE.
    #[must_use]
    pub fn cte_table(ctx: &Arc<PlanContext>, cte: Arc<CteDefinition>, stats: StatsInfo) -> Self {
        Self::bind(ctx, PhysicalOp::CteTable { cte }, stats, 0, Vec::new())
    }

    /// Ordered evaluation of side-effecting children; outputs the last
    /// child's rows and therefore carries its schema.
    pub fn sequence(
        ctx: &Arc<PlanContext>,
        children: Vec<Self>,
        stats: StatsInfo,
        qb_offset: usize,
        props: Vec<PhysicalProperty>,
    ) -> Result<Self, InternalError> {
        let Some(last) = children.last() else {
            return Err(InternalError::plan_invariant("sequence requires at least one child"));
        };
        let schema = last.schema().clone();

        Ok(Self::bind(ctx, PhysicalOp::Sequence, stats, qb_offset, props)
            .with_schema(schema)
            .with_children(children))
    }

    #[must_use]
    pub fn exchange_sender(
        ctx: &Arc<PlanContext>,
        exchange_type: ExchangeType,
        stats: StatsInfo,
    ) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::ExchangeSender { exchange_type },
            stats,
            0,
            Vec::new(),
        )
    }

    #[must_use]
    pub fn exchange_receiver(ctx: &Arc<PlanContext>, stats: StatsInfo) -> Self {
        Self::bind(ctx, PhysicalOp::ExchangeReceiver, stats, 0, Vec::new())
    }

    /// Shuffle over `tails`, each fed by the data source at the same index.
    pub fn shuffle(
        ctx: &Arc<PlanContext>,
        shuffle: Shuffle,
        stats: StatsInfo,
        qb_offset: usize,
        props: Vec<PhysicalProperty>,
    ) -> Result<Self, InternalError> {
        let ShuffleSplitter::Hash(split_by) = &shuffle.splitter;
        if shuffle.tails.len() != shuffle.data_sources.len()
            || split_by.len() != shuffle.data_sources.len()
        {
            return Err(InternalError::plan_invariant(format!(
                "shuffle has {} tails, {} data sources and {} split keys",
                shuffle.tails.len(),
                shuffle.data_sources.len(),
                split_by.len(),
            )));
        }
        if shuffle.concurrency == 0 {
            return Err(InternalError::plan_invariant("shuffle concurrency must be positive"));
        }

        Ok(Self::bind(ctx, PhysicalOp::Shuffle(shuffle), stats, qb_offset, props))
    }

    /// Placeholder leaf replaced at execution by data source `source_index`
    /// of the enclosing shuffle.
    #[must_use]
    pub fn shuffle_receiver_stub(
        ctx: &Arc<PlanContext>,
        source_index: usize,
        stats: StatsInfo,
        qb_offset: usize,
        props: Vec<PhysicalProperty>,
    ) -> Self {
        Self::bind(
            ctx,
            PhysicalOp::ShuffleReceiverStub { source_index },
            stats,
            qb_offset,
            props,
        )
    }
}
