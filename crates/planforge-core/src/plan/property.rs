use crate::plan::schema::SortItem;
use serde::Serialize;

///
/// StatsInfo
///
/// Row-count and per-column cardinality estimate produced by the cost
/// model. Attached verbatim; only the placeholder and the index-merge
/// partial sum are computed here.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatsInfo {
    pub row_count: f64,
    pub cardinality: Vec<f64>,

    /// Version of the statistics snapshot the estimate was derived from.
    pub stats_version: u64,
}

impl StatsInfo {
    #[must_use]
    pub const fn new(row_count: f64, stats_version: u64) -> Self {
        Self {
            row_count,
            cardinality: Vec::new(),
            stats_version,
        }
    }

    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Vec<f64>) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Estimate substituted for nodes the cost model does not estimate.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self::new(1.0, 0)
    }

    /// Scale row count and every cardinality by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            row_count: self.row_count * factor,
            cardinality: self.cardinality.iter().map(|c| c * factor).collect(),
            stats_version: self.stats_version,
        }
    }

    /// Scale so the row count becomes exactly `total`.
    #[must_use]
    pub fn scale_to_row_count(&self, total: f64) -> Self {
        if self.row_count <= 0.0 {
            return Self {
                row_count: total,
                ..self.clone()
            };
        }

        let mut scaled = self.scale(total / self.row_count);
        scaled.row_count = total;

        scaled
    }
}

///
/// Distribution
///
/// Data distribution a parent requires of one child.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Distribution {
    #[default]
    Any,
    Singleton,
    Broadcast,
    /// Rows hash-partitioned on the listed column unique ids.
    Hash(Vec<i64>),
}

///
/// PhysicalProperty
///
/// Required sort order and distribution for one child. Stored and
/// forwarded; never derived by construction.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PhysicalProperty {
    pub sort_items: Vec<SortItem>,
    pub distribution: Distribution,
}

impl PhysicalProperty {
    #[must_use]
    pub const fn sorted(sort_items: Vec<SortItem>) -> Self {
        Self {
            sort_items,
            distribution: Distribution::Any,
        }
    }

    #[must_use]
    pub const fn distributed(distribution: Distribution) -> Self {
        Self {
            sort_items: Vec::new(),
            distribution,
        }
    }
}
