use crate::catalog::{ColumnInfo, EXTRA_HANDLE_ID, EXTRA_PHYS_TABLE_ID, FieldType};
use derive_more::Deref;
use serde::Serialize;

///
/// Column
///
/// One output column of a plan node. `unique_id` identifies the column
/// within one compiled query; `col_id` points back at the catalog column.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Column {
    pub unique_id: i64,
    pub col_id: i64,
    pub name: String,
    pub field_type: FieldType,

    /// Catalog ids of the base columns a virtual generated column reads.
    pub virtual_deps: Option<Vec<i64>>,
}

impl Column {
    #[must_use]
    pub fn new(unique_id: i64, col_id: i64, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            unique_id,
            col_id,
            name: name.into(),
            field_type,
            virtual_deps: None,
        }
    }

    /// Bind a catalog column to a query-unique id.
    #[must_use]
    pub fn from_info(unique_id: i64, info: &ColumnInfo) -> Self {
        let virtual_deps = info
            .generated
            .as_ref()
            .filter(|generated| !generated.stored)
            .map(|generated| generated.depends_on.clone());

        Self {
            unique_id,
            col_id: info.id,
            name: info.name.clone(),
            field_type: info.field_type,
            virtual_deps,
        }
    }

    /// Hidden row-handle and physical-table-id columns.
    #[must_use]
    pub const fn is_extra(&self) -> bool {
        self.col_id == EXTRA_HANDLE_ID || self.col_id == EXTRA_PHYS_TABLE_ID
    }
}

///
/// Schema
///
/// Ordered output columns of one plan node.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    #[must_use]
    pub const fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn contains_col_id(&self, col_id: i64) -> bool {
        self.columns.iter().any(|column| column.col_id == col_id)
    }

    #[must_use]
    pub fn max_unique_id(&self) -> i64 {
        self.columns
            .iter()
            .map(|column| column.unique_id)
            .max()
            .unwrap_or_default()
    }

    pub(crate) fn insert(&mut self, index: usize, column: Column) {
        self.columns.insert(index, column);
    }

    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

///
/// SortItem
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SortItem {
    pub column: Column,
    pub desc: bool,
}

impl SortItem {
    #[must_use]
    pub const fn asc(column: Column) -> Self {
        Self {
            column,
            desc: false,
        }
    }

    #[must_use]
    pub const fn desc(column: Column) -> Self {
        Self { column, desc: true }
    }
}

///
/// HandleCols
///
/// Columns that identify a row: a single integer handle column or the
/// columns of a clustered composite primary key.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum HandleCols {
    Int(Column),
    Common(Vec<Column>),
}

impl HandleCols {
    #[must_use]
    pub const fn num_cols(&self) -> usize {
        match self {
            Self::Int(_) => 1,
            Self::Common(columns) => columns.len(),
        }
    }
}
