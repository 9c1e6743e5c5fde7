use crate::{
    codec::{DatumDecoder, MemcomparableDecoder},
    config::SessionVars,
    obs::{MetricsEvent, MetricsSink, NoopMetricsSink},
    plan::{PlanId, PlanIdAllocator},
};
use std::{fmt, sync::Arc};

///
/// PlanContext
///
/// Compiling-query context retained by every plan node: the id allocator,
/// session settings, the handle decoder, and the metrics sink.
///

pub struct PlanContext {
    ids: Arc<PlanIdAllocator>,
    session: SessionVars,
    decoder: Arc<dyn DatumDecoder>,
    metrics: Arc<dyn MetricsSink>,
}

impl PlanContext {
    /// Context backed by the process-wide id allocator.
    #[must_use]
    pub fn new(session: SessionVars) -> Self {
        Self {
            ids: PlanIdAllocator::global(),
            session,
            decoder: Arc::new(MemcomparableDecoder),
            metrics: Arc::new(NoopMetricsSink),
        }
    }

    #[must_use]
    pub fn with_id_allocator(mut self, ids: Arc<PlanIdAllocator>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn DatumDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    #[must_use]
    pub fn with_metrics_sink(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[must_use]
    pub const fn session(&self) -> &SessionVars {
        &self.session
    }

    #[must_use]
    pub fn decoder(&self) -> &dyn DatumDecoder {
        self.decoder.as_ref()
    }

    pub(crate) fn next_plan_id(&self) -> PlanId {
        self.ids.next_id()
    }

    pub(crate) fn record(&self, event: MetricsEvent) {
        self.metrics.record(event);
    }
}

impl fmt::Debug for PlanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanContext")
            .field("last_plan_id", &self.ids.last_issued())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
