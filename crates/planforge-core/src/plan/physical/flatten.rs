use crate::{
    error::InternalError,
    plan::physical::{PhysicalPlan, TableScan},
};
use derive_more::{Deref, IntoIterator};
use std::sync::Arc;

///
/// PushDownChain
///
/// Branch-free operator pipeline executed as one unit at the storage or
/// compute layer. Ordered leaf first: the access node is at index 0 and the
/// outermost wrapping operator is last.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct PushDownChain(Vec<Arc<PhysicalPlan>>);

impl PushDownChain {
    /// Access node at the bottom of the pipeline.
    #[must_use]
    pub fn head(&self) -> Option<&Arc<PhysicalPlan>> {
        self.0.first()
    }

    /// Outermost operator of the pipeline.
    #[must_use]
    pub fn root(&self) -> Option<&Arc<PhysicalPlan>> {
        self.0.last()
    }

    pub fn table_scans(&self) -> impl Iterator<Item = &TableScan> {
        self.0.iter().filter_map(|plan| plan.op().as_table_scan())
    }
}

/// Linearize a branch-free subtree leaf first.
///
/// A node with more than one child is rejected as an invariant violation;
/// branch-freedom is an upstream optimizer guarantee.
pub fn flatten_push_down_plan(root: &Arc<PhysicalPlan>) -> Result<PushDownChain, InternalError> {
    let mut nodes = Vec::new();
    let mut current = Arc::clone(root);

    loop {
        let next = match current.children() {
            [] => None,
            [only] => Some(Arc::clone(only)),
            many => {
                return Err(InternalError::plan_invariant(format!(
                    "push-down subtree is not branch-free: {} has {} children",
                    current.explain_id(),
                    many.len(),
                )));
            }
        };
        nodes.push(current);

        match next {
            Some(child) => current = child,
            None => break,
        }
    }
    nodes.reverse();

    Ok(PushDownChain(nodes))
}

/// Pre-order walk of a whole fragment tree, reversed.
///
/// Used for dataflow fragments, which legitimately branch (joins and
/// exchanges inside one fragment).
#[must_use]
pub fn flatten_tree_plan(root: &Arc<PhysicalPlan>) -> PushDownChain {
    fn walk(plan: &Arc<PhysicalPlan>, out: &mut Vec<Arc<PhysicalPlan>>) {
        out.push(Arc::clone(plan));
        for child in plan.children() {
            walk(child, out);
        }
    }

    let mut nodes = Vec::new();
    walk(root, &mut nodes);
    nodes.reverse();

    PushDownChain(nodes)
}

// Borrowed pre-order view over an owned subtree, used before it is shared.
pub(super) fn subtree_view(root: &PhysicalPlan) -> Vec<&PhysicalPlan> {
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(plan) = stack.pop() {
        out.push(plan);
        stack.extend(plan.children().iter().rev().map(AsRef::as_ref));
    }

    out
}
