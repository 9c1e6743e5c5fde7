use serde::Serialize;
use std::fmt;

///
/// PlanType
///
/// Operator type tag recorded on every plan node. Used for diagnostics,
/// serialization, and EXPLAIN ids (`<tag>_<id>`). Logical and physical
/// realizations of the same operator share a tag.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PlanType {
    Aggregation,
    Apply,
    BatchPointGet,
    Cte,
    CteTable,
    DataSource,
    ExchangeReceiver,
    ExchangeSender,
    Expand,
    ForeignKeyCascade,
    ForeignKeyCheck,
    HashAgg,
    HashJoin,
    IndexHashJoin,
    IndexJoin,
    IndexLookUp,
    IndexMerge,
    IndexMergeJoin,
    IndexReader,
    IndexScan,
    Join,
    Limit,
    Lock,
    MaxOneRow,
    MemTableScan,
    MergeJoin,
    PartitionUnion,
    PointGet,
    Projection,
    Selection,
    Sequence,
    Show,
    ShowDdlJobs,
    Shuffle,
    ShuffleReceiver,
    SingleGather,
    Sort,
    StreamAgg,
    TableDual,
    TableReader,
    TableSample,
    TableScan,
    TopN,
    Union,
    UnionScan,
    Window,
}

impl PlanType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aggregation => "Aggregation",
            Self::Apply => "Apply",
            Self::BatchPointGet => "BatchPointGet",
            Self::Cte => "CTE",
            Self::CteTable => "CTETable",
            Self::DataSource => "DataSource",
            Self::ExchangeReceiver => "ExchangeReceiver",
            Self::ExchangeSender => "ExchangeSender",
            Self::Expand => "Expand",
            Self::ForeignKeyCascade => "ForeignKeyCascade",
            Self::ForeignKeyCheck => "ForeignKeyCheck",
            Self::HashAgg => "HashAgg",
            Self::HashJoin => "HashJoin",
            Self::IndexHashJoin => "IndexHashJoin",
            Self::IndexJoin => "IndexJoin",
            Self::IndexLookUp => "IndexLookUp",
            Self::IndexMerge => "IndexMerge",
            Self::IndexMergeJoin => "IndexMergeJoin",
            Self::IndexReader => "IndexReader",
            Self::IndexScan => "IndexScan",
            Self::Join => "Join",
            Self::Limit => "Limit",
            Self::Lock => "SelectLock",
            Self::MaxOneRow => "MaxOneRow",
            Self::MemTableScan => "MemTableScan",
            Self::MergeJoin => "MergeJoin",
            Self::PartitionUnion => "PartitionUnion",
            Self::PointGet => "PointGet",
            Self::Projection => "Projection",
            Self::Selection => "Selection",
            Self::Sequence => "Sequence",
            Self::Show => "Show",
            Self::ShowDdlJobs => "ShowDDLJobs",
            Self::Shuffle => "Shuffle",
            Self::ShuffleReceiver => "ShuffleReceiver",
            Self::SingleGather => "SingleGather",
            Self::Sort => "Sort",
            Self::StreamAgg => "StreamAgg",
            Self::TableDual => "TableDual",
            Self::TableReader => "TableReader",
            Self::TableSample => "TableSample",
            Self::TableScan => "TableScan",
            Self::TopN => "TopN",
            Self::Union => "Union",
            Self::UnionScan => "UnionScan",
            Self::Window => "Window",
        }
    }

    /// Whether nodes with this tag reduce rows on the storage side before the
    /// coordinator merges results.
    #[must_use]
    pub const fn is_pre_reduction(self) -> bool {
        matches!(self, Self::HashAgg | Self::StreamAgg | Self::TopN)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
