use crate::{
    catalog::{StoreEngine, TableInfo},
    plan::{
        PlanContext,
        physical::{PhysicalOp, PhysicalPlan, ReadRequestMode},
        property::StatsInfo,
        schema::{HandleCols, Schema, SortItem},
    },
};
use std::sync::Arc;

///
/// TableScan
///
/// Row-range scan over one table replica. `read_mode` is staged: it is
/// written by the enclosing table reader's router before that reader's
/// constructor returns, and never afterwards.
///

#[derive(Clone, Debug)]
pub struct TableScan {
    pub table: Arc<TableInfo>,
    pub store_engine: StoreEngine,
    pub handle_cols: HandleCols,
    pub keep_order: bool,
    pub desc: bool,
    pub by_items: Vec<SortItem>,
    read_mode: ReadRequestMode,
}

impl TableScan {
    #[must_use]
    pub const fn new(
        table: Arc<TableInfo>,
        store_engine: StoreEngine,
        handle_cols: HandleCols,
    ) -> Self {
        Self {
            table,
            store_engine,
            handle_cols,
            keep_order: false,
            desc: false,
            by_items: Vec::new(),
            read_mode: ReadRequestMode::RowCoprocessor,
        }
    }

    /// Require the scan to return rows in `by_items` order.
    #[must_use]
    pub fn keeping_order(mut self, by_items: Vec<SortItem>, desc: bool) -> Self {
        self.keep_order = true;
        self.desc = desc;
        self.by_items = by_items;
        self
    }

    #[must_use]
    pub const fn read_mode(&self) -> ReadRequestMode {
        self.read_mode
    }

    pub(crate) const fn set_read_mode(&mut self, mode: ReadRequestMode) {
        self.read_mode = mode;
    }
}

///
/// IndexScan
///
/// Index-range scan. `data_source_schema` is the schema of the indexed
/// table, which index-merge readers expose instead of the index columns.
///

#[derive(Clone, Debug)]
pub struct IndexScan {
    pub table: Arc<TableInfo>,
    pub index_id: i64,
    pub store_engine: StoreEngine,
    pub data_source_schema: Schema,
    pub keep_order: bool,
    pub desc: bool,
    pub by_items: Vec<SortItem>,
}

impl IndexScan {
    #[must_use]
    pub const fn new(table: Arc<TableInfo>, index_id: i64, data_source_schema: Schema) -> Self {
        Self {
            table,
            index_id,
            store_engine: StoreEngine::RowStore,
            data_source_schema,
            keep_order: false,
            desc: false,
            by_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn keeping_order(mut self, by_items: Vec<SortItem>, desc: bool) -> Self {
        self.keep_order = true;
        self.desc = desc;
        self.by_items = by_items;
        self
    }
}

impl PhysicalPlan {
    #[must_use]
    pub fn table_scan(
        ctx: &Arc<PlanContext>,
        scan: TableScan,
        schema: Schema,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Self {
        Self::bind(ctx, PhysicalOp::TableScan(scan), stats, qb_offset, Vec::new())
            .with_schema(schema)
    }

    #[must_use]
    pub fn index_scan(
        ctx: &Arc<PlanContext>,
        scan: IndexScan,
        schema: Schema,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Self {
        Self::bind(ctx, PhysicalOp::IndexScan(scan), stats, qb_offset, Vec::new())
            .with_schema(schema)
    }
}
