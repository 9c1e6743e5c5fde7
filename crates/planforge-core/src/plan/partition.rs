//! Module: plan::partition
//! Responsibility: per-row physical partition resolution for point lookups.
//! Does not own: partition expression semantics (catalog) or handle
//! encoding (codec).
//! Boundary: resolution is all-or-nothing and never fails construction; an
//! unavailable result means the executor broadcasts to every partition.

use crate::{
    catalog::{PartitionError, TableInfo},
    codec::{DecodeError, Datum, Handle},
    obs::{MetricsEvent, PartitionRoutingOutcome},
    plan::PlanContext,
};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// PartitionColumnPos
///
/// Position of the partition column inside each lookup key.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum PartitionColumnPos {
    At(usize),

    /// Global index that does not contain the partition column; rows are
    /// located through the index itself and no routing is computed.
    GlobalWithoutColumn,
}

///
/// PartitionRouting
///
/// One physical partition id per lookup row, position aligned, or nothing.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub enum PartitionRouting {
    #[default]
    Unavailable,
    Resolved(Vec<i64>),
}

impl PartitionRouting {
    /// Resolved ids; empty when routing is unavailable.
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        match self {
            Self::Unavailable => &[],
            Self::Resolved(ids) => ids,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

///
/// LookupKeys
///
/// Lookup rows of a point get: either row handles or index value tuples.
///

#[derive(Clone, Copy, Debug)]
pub enum LookupKeys<'a> {
    Handles(&'a [Handle]),
    IndexValues(&'a [Vec<Datum>]),
}

impl LookupKeys<'_> {
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Handles(handles) => handles.len(),
            Self::IndexValues(values) => values.len(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// RowRoutingError
///
/// Why one lookup row could not be routed.
///

#[derive(Debug, ThisError)]
enum RowRoutingError {
    #[error("row {row}: {source}")]
    Decode { row: usize, source: DecodeError },

    #[error("row {row}: {source}")]
    Partition { row: usize, source: PartitionError },
}

/// Resolve every lookup row to a physical partition id.
///
/// Integer handles feed the partition expression directly; common handles
/// have the partition column decoded from their encoded bytes; index value
/// tuples are read at the partition column position. The first failing row
/// discards the whole result.
pub(crate) fn resolve_partitions(
    ctx: &PlanContext,
    table: &TableInfo,
    keys: LookupKeys<'_>,
    pos: PartitionColumnPos,
) -> PartitionRouting {
    let rows = keys.len();
    let skipped = || {
        ctx.record(MetricsEvent::PartitionRouting {
            rows,
            outcome: PartitionRoutingOutcome::Skipped,
        });
        PartitionRouting::Unavailable
    };

    let PartitionColumnPos::At(pos) = pos else {
        return skipped();
    };
    if table.partition.is_none() {
        return skipped();
    }

    match route_rows(ctx, table, keys, pos) {
        Ok(ids) => {
            ctx.record(MetricsEvent::PartitionRouting {
                rows,
                outcome: PartitionRoutingOutcome::Resolved,
            });
            PartitionRouting::Resolved(ids)
        }
        Err(err) => {
            tracing::warn!(
                table = %table.name,
                rows,
                error = %err,
                "partition routing unavailable, lookup will broadcast",
            );
            ctx.record(MetricsEvent::PartitionRouting {
                rows,
                outcome: PartitionRoutingOutcome::Discarded,
            });
            PartitionRouting::Unavailable
        }
    }
}

fn route_rows(
    ctx: &PlanContext,
    table: &TableInfo,
    keys: LookupKeys<'_>,
    pos: usize,
) -> Result<Vec<i64>, RowRoutingError> {
    let locate = |row: usize, value: &Datum| {
        table
            .physical_partition_id(value)
            .map_err(|source| RowRoutingError::Partition { row, source })
    };

    match keys {
        LookupKeys::Handles(handles) => handles
            .iter()
            .enumerate()
            .map(|(row, handle)| {
                let value = match handle {
                    Handle::Int(v) => Datum::Int(*v),
                    Handle::Common(common) => common
                        .encoded_col(pos)
                        .and_then(|bytes| ctx.decoder().decode_column(bytes))
                        .map_err(|source| RowRoutingError::Decode { row, source })?,
                };

                locate(row, &value)
            })
            .collect(),
        LookupKeys::IndexValues(tuples) => tuples
            .iter()
            .enumerate()
            .map(|(row, tuple)| {
                let value = tuple.get(pos).ok_or(RowRoutingError::Decode {
                    row,
                    source: DecodeError::ColumnOutOfRange {
                        pos,
                        len: tuple.len(),
                    },
                })?;

                locate(row, value)
            })
            .collect(),
    }
}
