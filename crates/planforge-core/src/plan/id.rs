use derive_more::Display;
use serde::Serialize;
use std::sync::{
    Arc, LazyLock,
    atomic::{AtomicU64, Ordering},
};

static GLOBAL_ALLOCATOR: LazyLock<Arc<PlanIdAllocator>> =
    LazyLock::new(|| Arc::new(PlanIdAllocator::new()));

///
/// PlanId
///
/// Process-unique plan node identifier. Ids are only compared for equality
/// and within one allocator for issue order; queries never order by each
/// other's ids.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlanId(u64);

impl PlanId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// PlanIdAllocator
///
/// Monotonic plan-id counter shared by every compiling query that uses it.
/// The process-wide instance is created on first use and never reset; tests
/// inject private allocators for deterministic ids.
///

#[derive(Debug, Default)]
pub struct PlanIdAllocator {
    last: AtomicU64,
}

impl PlanIdAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Shared process-wide allocator.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_ALLOCATOR)
    }

    /// Issue the next id. Exactly one increment per call.
    pub fn next_id(&self) -> PlanId {
        PlanId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Most recently issued id value (0 before the first issue).
    #[must_use]
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}
