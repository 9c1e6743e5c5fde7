use crate::{
    catalog::{ColumnInfo, EXTRA_HANDLE_ID, EXTRA_PHYS_TABLE_ID, TableInfo},
    codec::{Datum, Handle},
    plan::{
        PlanContext,
        partition::{LookupKeys, PartitionColumnPos, PartitionRouting, resolve_partitions},
        physical::{PhysicalOp, PhysicalPlan},
        property::StatsInfo,
        schema::{Column, Schema},
    },
};
use std::sync::Arc;

///
/// PointGetSpec
///
/// Declared shape of a point lookup before virtual-column expansion and
/// partition routing.
///

#[derive(Clone, Debug)]
pub struct PointGetSpec {
    pub table: Arc<TableInfo>,
    pub index_id: Option<i64>,
    pub columns: Vec<ColumnInfo>,
    pub schema: Schema,
    pub partition_col_pos: PartitionColumnPos,
}

///
/// PointGetKey
///

#[derive(Clone, Debug)]
pub enum PointGetKey {
    Handle(Handle),
    IndexValues(Vec<Datum>),
}

///
/// BatchPointGetKeys
///

#[derive(Clone, Debug)]
pub enum BatchPointGetKeys {
    Handles(Vec<Handle>),
    IndexValues(Vec<Vec<Datum>>),
}

impl BatchPointGetKeys {
    const fn as_lookup(&self) -> LookupKeys<'_> {
        match self {
            Self::Handles(handles) => LookupKeys::Handles(handles.as_slice()),
            Self::IndexValues(values) => LookupKeys::IndexValues(values.as_slice()),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.as_lookup().len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// PointGet
///

#[derive(Clone, Debug)]
pub struct PointGet {
    pub table: Arc<TableInfo>,
    pub index_id: Option<i64>,
    pub columns: Vec<ColumnInfo>,
    pub key: PointGetKey,
    partition_routing: PartitionRouting,
}

impl PointGet {
    /// Physical partition of the single row, if routing resolved.
    #[must_use]
    pub fn partition_id(&self) -> Option<i64> {
        self.partition_routing.ids().first().copied()
    }

    #[must_use]
    pub const fn partition_routing(&self) -> &PartitionRouting {
        &self.partition_routing
    }
}

///
/// BatchPointGet
///
/// Multi-row point lookup. `partition_routing` is either one id per key,
/// position aligned, or unavailable (the executor then broadcasts).
///

#[derive(Clone, Debug)]
pub struct BatchPointGet {
    pub table: Arc<TableInfo>,
    pub index_id: Option<i64>,
    pub columns: Vec<ColumnInfo>,
    pub keys: BatchPointGetKeys,
    pub partition_col_pos: PartitionColumnPos,
    partition_routing: PartitionRouting,
}

impl BatchPointGet {
    #[must_use]
    pub const fn partition_routing(&self) -> &PartitionRouting {
        &self.partition_routing
    }
}

const fn is_extra_col_id(col_id: i64) -> bool {
    col_id == EXTRA_HANDLE_ID || col_id == EXTRA_PHYS_TABLE_ID
}

/// Expand read columns and schema with the base columns that virtual
/// generated columns of `schema` depend on.
///
/// Dependencies are appended once each, after the existing columns but
/// before any trailing extra handle or physical-table-id columns.
#[must_use]
pub fn expand_virtual_columns(
    mut columns: Vec<ColumnInfo>,
    mut schema: Schema,
    table: &TableInfo,
) -> (Vec<ColumnInfo>, Schema) {
    let deps = schema
        .iter()
        .filter_map(|column| column.virtual_deps.clone())
        .flatten()
        .collect::<Vec<_>>();
    let mut next_unique_id = schema.max_unique_id() + 1;

    for dep in deps {
        let Some(info) = table.column_by_id(dep) else {
            continue;
        };

        if !columns.iter().any(|column| column.id == dep) {
            let at = columns
                .iter()
                .rposition(|column| !is_extra_col_id(column.id))
                .map_or(0, |i| i + 1);
            columns.insert(at, info.clone());
        }

        if !schema.contains_col_id(dep) {
            let at = schema
                .iter()
                .rposition(|column| !column.is_extra())
                .map_or(0, |i| i + 1);
            schema.insert(at, Column::from_info(next_unique_id, info));
            next_unique_id += 1;
        }
    }

    (columns, schema)
}

impl PhysicalPlan {
    /// Single-row point lookup. Resolves the row's partition with the
    /// batch resolver over a one-element key set.
    #[must_use]
    pub fn point_get(
        ctx: &Arc<PlanContext>,
        spec: PointGetSpec,
        key: PointGetKey,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Self {
        let (columns, schema) = expand_virtual_columns(spec.columns, spec.schema, &spec.table);
        let lookup = match &key {
            PointGetKey::Handle(handle) => LookupKeys::Handles(std::slice::from_ref(handle)),
            PointGetKey::IndexValues(values) => {
                LookupKeys::IndexValues(std::slice::from_ref(values))
            }
        };
        let partition_routing = resolve_partitions(ctx, &spec.table, lookup, spec.partition_col_pos);

        let point_get = PointGet {
            table: spec.table,
            index_id: spec.index_id,
            columns,
            key,
            partition_routing,
        };

        Self::bind(ctx, PhysicalOp::PointGet(point_get), stats, qb_offset, Vec::new())
            .with_schema(schema)
    }

    /// Multi-row point lookup with all-or-nothing partition routing.
    #[must_use]
    pub fn batch_point_get(
        ctx: &Arc<PlanContext>,
        spec: PointGetSpec,
        keys: BatchPointGetKeys,
        stats: StatsInfo,
        qb_offset: usize,
    ) -> Self {
        let (columns, schema) = expand_virtual_columns(spec.columns, spec.schema, &spec.table);
        let partition_routing =
            resolve_partitions(ctx, &spec.table, keys.as_lookup(), spec.partition_col_pos);

        let batch = BatchPointGet {
            table: spec.table,
            index_id: spec.index_id,
            columns,
            keys,
            partition_col_pos: spec.partition_col_pos,
            partition_routing,
        };

        Self::bind(ctx, PhysicalOp::BatchPointGet(batch), stats, qb_offset, Vec::new())
            .with_schema(schema)
    }
}
