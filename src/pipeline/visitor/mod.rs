//! Visitor protocol over graph nodes.
//!
//! A driver picks the next node (usually from a level-order iterator) and
//! calls [`Graph::visit`], which dispatches on the node variant to
//! [`Visitor::visit_plain_node`] or [`Visitor::visit_composite_node`]. The
//! meaning of the returned flag is up to each visitor.
//!
//! ```text
//! SettingUpVisitor    set_up() once per distinct unit, descends into composites
//! ProcessingVisitor   pull inputs → process → push outputs
//! DismantlingVisitor  dismantle() once per distinct unit, descends into composites
//! ```

mod lifecycle;
mod processing;

pub use lifecycle::{DismantlingVisitor, SettingUpVisitor};
pub use processing::ProcessingVisitor;

use crate::error::Result;
use crate::pipeline::graph::Graph;
use crate::pipeline::id::NodeId;
use crate::pipeline::iter::OneShotLevelOrder;

/// Per-variant operations applied to graph nodes.
pub trait Visitor {
    fn visit_plain_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool>;

    fn visit_composite_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool>;
}

/// Inner nodes of composite `id` in one-shot level order from its sources.
pub(crate) fn inner_order(graph: &Graph, id: NodeId) -> Result<Vec<NodeId>> {
    let composite = graph.composite(id)?;
    Ok(OneShotLevelOrder::new(graph, composite.sources()).collect())
}
