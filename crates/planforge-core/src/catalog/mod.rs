//! Module: catalog
//! Responsibility: read-only table metadata consumed by plan construction.
//! Does not own: schema changes, statistics, or expression type inference.
//! Boundary: tables are built by the SQL catalog and shared by `Arc`.

mod partition;

pub use partition::{
    PartitionDefinition, PartitionError, PartitionExpr, PartitionInfo, RangeBound,
};

use serde::Serialize;
use std::fmt;

/// Catalog column id of the hidden row-handle column.
pub const EXTRA_HANDLE_ID: i64 = -1;

/// Catalog column id of the hidden physical-table-id column.
pub const EXTRA_PHYS_TABLE_ID: i64 = -24;

///
/// StoreEngine
///
/// Storage engine backing the replica a scan reads.
/// Only the columnar engine supports batched and dataflow dispatch.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub enum StoreEngine {
    #[default]
    RowStore,
    Columnar,
    Coordinator,
}

impl StoreEngine {
    #[must_use]
    pub const fn is_columnar(self) -> bool {
        matches!(self, Self::Columnar)
    }
}

impl fmt::Display for StoreEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RowStore => "row_store",
            Self::Columnar => "columnar",
            Self::Coordinator => "coordinator",
        };
        write!(f, "{label}")
    }
}

///
/// FieldType
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum FieldType {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Bytes,
}

///
/// GeneratedColumn
///
/// Generated-column metadata. Virtual columns are computed on read from the
/// base columns they depend on.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedColumn {
    pub stored: bool,
    pub depends_on: Vec<i64>,
}

///
/// ColumnInfo
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnInfo {
    pub id: i64,
    pub name: String,
    pub field_type: FieldType,
    pub generated: Option<GeneratedColumn>,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            generated: None,
        }
    }

    /// Mark this column as a virtual generated column over `depends_on`.
    #[must_use]
    pub fn virtual_over(mut self, depends_on: Vec<i64>) -> Self {
        self.generated = Some(GeneratedColumn {
            stored: false,
            depends_on,
        });
        self
    }

    #[must_use]
    pub fn is_virtual_generated(&self) -> bool {
        self.generated.as_ref().is_some_and(|g| !g.stored)
    }
}

///
/// IndexInfo
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexInfo {
    pub id: i64,
    pub name: String,
    pub columns: Vec<i64>,
    pub unique: bool,
    pub global: bool,
}

///
/// TableInfo
///
/// Catalog view of one logical table: columns, indexes, and partitioning.
///

#[derive(Clone, Debug, PartialEq)]
pub struct TableInfo {
    pub id: i64,
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    pub partition: Option<PartitionInfo>,
}

impl TableInfo {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            id,
            name: name.into(),
            columns,
            indexes: Vec::new(),
            partition: None,
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: IndexInfo) -> Self {
        self.indexes.push(index);
        self
    }

    #[must_use]
    pub fn with_partition(mut self, partition: PartitionInfo) -> Self {
        self.partition = Some(partition);
        self
    }

    #[must_use]
    pub fn column_by_id(&self, id: i64) -> Option<&ColumnInfo> {
        self.columns.iter().find(|column| column.id == id)
    }

    #[must_use]
    pub fn index_by_id(&self, id: i64) -> Option<&IndexInfo> {
        self.indexes.iter().find(|index| index.id == id)
    }

    /// Map one partition-column value to its physical partition id.
    pub fn physical_partition_id(
        &self,
        value: &crate::codec::Datum,
    ) -> Result<i64, PartitionError> {
        let partition = self
            .partition
            .as_ref()
            .ok_or(PartitionError::NotPartitioned {
                table: self.name.clone(),
            })?;

        partition.locate_physical_id(value)
    }
}
