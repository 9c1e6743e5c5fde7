use crate::codec::{Datum, encode_datums};
use thiserror::Error as ThisError;
use xxhash_rust::xxh3::xxh3_64;

///
/// PartitionError
///
/// Failure to evaluate a partition expression for one value.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PartitionError {
    #[error("table '{table}' is not partitioned")]
    NotPartitioned { table: String },

    #[error("partition table has no partition definitions")]
    NoDefinitions,

    #[error("value kind '{kind}' is not supported by {method} partitioning")]
    UnsupportedValue {
        kind: &'static str,
        method: &'static str,
    },

    #[error("no partition matches value {value}")]
    NoMatchingPartition { value: String },

    #[error("partition index {index} out of range ({len} definitions)")]
    DefinitionOutOfRange { index: usize, len: usize },
}

///
/// RangeBound
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangeBound {
    LessThan(i64),
    MaxValue,
}

///
/// PartitionExpr
///
/// Catalog-defined partition function over the single partition column.
/// Range and list expressions carry one entry per partition definition.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PartitionExpr {
    Hash,
    Key,
    Range(Vec<RangeBound>),
    List(Vec<Vec<Datum>>),
}

impl PartitionExpr {
    const fn method(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Key => "key",
            Self::Range(_) => "range",
            Self::List(_) => "list",
        }
    }

    /// Evaluate the expression to a partition definition index.
    pub fn locate(&self, value: &Datum, partitions: usize) -> Result<usize, PartitionError> {
        if partitions == 0 {
            return Err(PartitionError::NoDefinitions);
        }

        match self {
            Self::Hash => {
                if value.is_null() {
                    return Ok(0);
                }
                let v = value.as_i64().ok_or(PartitionError::UnsupportedValue {
                    kind: value.kind(),
                    method: self.method(),
                })?;

                Ok(modulo(v.unsigned_abs(), partitions))
            }
            Self::Key => {
                if value.is_null() {
                    return Ok(0);
                }
                let hash = xxh3_64(&encode_datums(std::slice::from_ref(value)));

                Ok(modulo(hash, partitions))
            }
            Self::Range(bounds) => {
                if value.is_null() {
                    return Ok(0);
                }
                let v = value.as_i64().ok_or(PartitionError::UnsupportedValue {
                    kind: value.kind(),
                    method: self.method(),
                })?;

                bounds
                    .iter()
                    .position(|bound| match bound {
                        RangeBound::LessThan(limit) => v < *limit,
                        RangeBound::MaxValue => true,
                    })
                    .ok_or_else(|| PartitionError::NoMatchingPartition {
                        value: value.to_string(),
                    })
            }
            Self::List(lists) => lists
                .iter()
                .position(|list| list.contains(value))
                .ok_or_else(|| PartitionError::NoMatchingPartition {
                    value: value.to_string(),
                }),
        }
    }
}

// Partition counts are tiny; the remainder always fits back into usize.
fn modulo(value: u64, partitions: usize) -> usize {
    let partitions = partitions as u64;

    usize::try_from(value % partitions).unwrap_or_default()
}

///
/// PartitionDefinition
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PartitionDefinition {
    pub id: i64,
    pub name: String,
}

impl PartitionDefinition {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

///
/// PartitionInfo
///

#[derive(Clone, Debug, PartialEq)]
pub struct PartitionInfo {
    pub expr: PartitionExpr,
    pub column_id: i64,
    pub definitions: Vec<PartitionDefinition>,
}

impl PartitionInfo {
    #[must_use]
    pub const fn new(
        expr: PartitionExpr,
        column_id: i64,
        definitions: Vec<PartitionDefinition>,
    ) -> Self {
        Self {
            expr,
            column_id,
            definitions,
        }
    }

    /// Evaluate the partition expression and map the index to a physical id.
    pub fn locate_physical_id(&self, value: &Datum) -> Result<i64, PartitionError> {
        let index = self.expr.locate(value, self.definitions.len())?;

        self.definitions
            .get(index)
            .map(|definition| definition.id)
            .ok_or(PartitionError::DefinitionOutOfRange {
                index,
                len: self.definitions.len(),
            })
    }
}
