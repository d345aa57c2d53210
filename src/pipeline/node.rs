//! Node abstraction for the graph.
//!
//! Two variants, matched exhaustively by every visitor:
//! - **`PlainNode`**: wraps exactly one unit.
//! - **`CompositeNode`**: wraps a private inner graph with entry `sources`
//!   and a single exit `sink`. It exposes the same edge contract as a plain
//!   node, so composites nest arbitrarily.
//!
//! A node only records its neighbours and the `LinkId` shared with each of
//! them. Link contents live in the graph arena; all traversal and execution
//! behaviour lives in the visitors.

use crate::error::{FlowError, Result};
use crate::pipeline::id::{LinkId, NodeId, UnitId};
use std::collections::BTreeMap;

/// Node wrapping a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainNode {
    unit: UnitId,
}

impl PlainNode {
    pub fn new(unit: UnitId) -> Self {
        Self { unit }
    }

    /// The wrapped unit. Fixed at construction.
    pub fn unit(&self) -> UnitId {
        self.unit
    }
}

/// Node wrapping an inner sub-graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeNode {
    sources: Vec<NodeId>,
    sink: NodeId,
}

impl CompositeNode {
    /// `sources` is de-duplicated, keeping first-seen order.
    pub fn new(sources: impl IntoIterator<Item = NodeId>, sink: NodeId) -> Self {
        let mut deduped: Vec<NodeId> = Vec::new();
        for id in sources {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        Self {
            sources: deduped,
            sink,
        }
    }

    /// Entry points of the inner graph.
    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    /// Single exit point of the inner graph.
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    pub fn is_source(&self, id: NodeId) -> bool {
        self.sources.contains(&id)
    }
}

/// Closed set of node variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Plain(PlainNode),
    Composite(CompositeNode),
}

/// A vertex of the execution graph.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    /// Composite whose inner graph contains this node, if any.
    owner: Option<NodeId>,
    /// predecessor → inbound link
    inbound: BTreeMap<NodeId, LinkId>,
    /// successor → outbound link
    outbound: BTreeMap<NodeId, LinkId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            owner: None,
            inbound: BTreeMap::new(),
            outbound: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Composite(_))
    }

    /// Composite that owns this node, `None` for top-level nodes.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        self.owner = Some(owner);
    }

    // ── Edge contract ──

    /// Register `successor` reached through `link`.
    pub fn add_successor(&mut self, successor: NodeId, link: LinkId) {
        self.outbound.insert(successor, link);
    }

    /// Register `predecessor` feeding this node through `link`.
    pub fn add_predecessor(&mut self, predecessor: NodeId, link: LinkId) {
        self.inbound.insert(predecessor, link);
    }

    /// Forget the edge to `successor`. Returns the link it used.
    pub fn remove_successor(&mut self, successor: NodeId) -> Option<LinkId> {
        self.outbound.remove(&successor)
    }

    /// Forget the edge from `predecessor`. Returns the link it used.
    pub fn remove_predecessor(&mut self, predecessor: NodeId) -> Option<LinkId> {
        self.inbound.remove(&predecessor)
    }

    /// Predecessors in ascending id order.
    pub fn predecessors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inbound.keys().copied()
    }

    /// Successors in ascending id order.
    pub fn successors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outbound.keys().copied()
    }

    /// `(predecessor, link)` pairs in ascending predecessor order.
    pub fn inbound_links(&self) -> impl Iterator<Item = (NodeId, LinkId)> + '_ {
        self.inbound.iter().map(|(&n, &l)| (n, l))
    }

    /// `(successor, link)` pairs in ascending successor order.
    pub fn outbound_links(&self) -> impl Iterator<Item = (NodeId, LinkId)> + '_ {
        self.outbound.iter().map(|(&n, &l)| (n, l))
    }

    pub fn has_predecessor(&self, node: NodeId) -> bool {
        self.inbound.contains_key(&node)
    }

    pub fn has_successor(&self, node: NodeId) -> bool {
        self.outbound.contains_key(&node)
    }

    /// A node without predecessors is a source.
    pub fn has_predecessors(&self) -> bool {
        !self.inbound.is_empty()
    }

    pub fn predecessor_count(&self) -> usize {
        self.inbound.len()
    }

    pub fn successor_count(&self) -> usize {
        self.outbound.len()
    }

    /// Link shared with predecessor `node`; `self_id` is only used for the error.
    pub fn inbound_link(&self, self_id: NodeId, node: NodeId) -> Result<LinkId> {
        self.inbound
            .get(&node)
            .copied()
            .ok_or(FlowError::NotAdjacent {
                node: self_id,
                neighbor: node,
            })
    }

    /// Link shared with successor `node`; `self_id` is only used for the error.
    pub fn outbound_link(&self, self_id: NodeId, node: NodeId) -> Result<LinkId> {
        self.outbound
            .get(&node)
            .copied()
            .ok_or(FlowError::NotAdjacent {
                node: self_id,
                neighbor: node,
            })
    }
}
