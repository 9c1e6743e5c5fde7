use crate::{
    obs::MetricsEvent,
    plan::{PlanContext, PlanId, PlanType, schema::Schema},
};
use std::{fmt, sync::Arc};

///
/// PlanBase
///
/// Identity shared by logical and physical nodes: fresh id, type tag,
/// query-block offset, output schema, and the retained compiling context.
///

#[derive(Clone)]
pub struct PlanBase {
    id: PlanId,
    tp: PlanType,
    qb_offset: usize,
    schema: Schema,
    ctx: Arc<PlanContext>,
}

impl PlanBase {
    /// Bind a fresh identity. Issues exactly one plan id.
    #[must_use]
    pub fn new(ctx: &Arc<PlanContext>, tp: PlanType, qb_offset: usize) -> Self {
        let id = ctx.next_plan_id();
        ctx.record(MetricsEvent::NodeBuilt { tp });

        Self {
            id,
            tp,
            qb_offset,
            schema: Schema::empty(),
            ctx: Arc::clone(ctx),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PlanId {
        self.id
    }

    #[must_use]
    pub const fn tp(&self) -> PlanType {
        self.tp
    }

    #[must_use]
    pub const fn qb_offset(&self) -> usize {
        self.qb_offset
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub const fn ctx(&self) -> &Arc<PlanContext> {
        &self.ctx
    }

    /// EXPLAIN identifier, `<tag>_<id>`.
    #[must_use]
    pub fn explain_id(&self) -> String {
        format!("{}_{}", self.tp, self.id)
    }

    pub(crate) fn set_schema(&mut self, schema: Schema) {
        self.schema = schema;
    }

    // Same node content under a new identity and tag.
    pub(crate) fn retag(&self, tp: PlanType) -> Self {
        let mut base = Self::new(&self.ctx, tp, self.qb_offset);
        base.schema = self.schema.clone();

        base
    }
}

impl fmt::Debug for PlanBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanBase")
            .field("id", &self.id)
            .field("tp", &self.tp)
            .field("qb_offset", &self.qb_offset)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
