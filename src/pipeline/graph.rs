//! Graph arena owning every node, link and unit.
//!
//! Nodes, links and units are stored in flat vectors and addressed by their
//! newtype ids. A link is created once per edge and its `LinkId` is recorded
//! on both endpoints, so `A.outbound[B]` and `B.inbound[A]` always resolve to
//! the same queue.
//!
//! Composite nodes do not get a separate arena: their inner nodes live here
//! too, marked with the composite as their owner. Edges may only join nodes
//! with the same owner, which keeps an inner graph private to its composite.

use crate::error::{FlowError, Result, Stage};
use crate::pipeline::id::{LinkId, NodeId, UnitId};
use crate::pipeline::iter::OneShotLevelOrder;
use crate::pipeline::link::Link;
use crate::pipeline::node::{CompositeNode, Node, NodeKind, PlainNode};
use crate::pipeline::unit::{Unit, UnitSlot};
use crate::pipeline::value::{Batch, Value};
use crate::pipeline::visitor::Visitor;
use std::collections::HashSet;

/// The execution graph.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    units: Vec<UnitSlot>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Graph building ──

    /// Move a unit into the arena. Returns its identity.
    pub fn add_unit(&mut self, name: impl Into<String>, unit: impl Unit + 'static) -> UnitId {
        self.add_boxed_unit(name, Box::new(unit))
    }

    pub fn add_boxed_unit(&mut self, name: impl Into<String>, unit: Box<dyn Unit>) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(UnitSlot::new(name, unit));
        id
    }

    /// Add a plain node wrapping an existing unit. Several nodes may wrap
    /// the same unit; lifecycle calls are still made once per unit.
    pub fn add_plain(&mut self, name: impl Into<String>, unit: UnitId) -> Result<NodeId> {
        if unit.index() >= self.units.len() {
            return Err(FlowError::UnknownUnit(unit));
        }
        Ok(self.push_node(Node::new(name, NodeKind::Plain(PlainNode::new(unit)))))
    }

    /// Add a unit and a plain node wrapping it, both under `name`.
    pub fn add_unit_node(&mut self, name: impl Into<String>, unit: impl Unit + 'static) -> NodeId {
        let name = name.into();
        let unit = self.add_unit(name.clone(), unit);
        self.push_node(Node::new(name, NodeKind::Plain(PlainNode::new(unit))))
    }

    /// Wrap the already wired sub-graph reachable from `sources` into a
    /// composite node.
    ///
    /// Rejected when `sources` is empty, `sink` is not reachable from the
    /// sources, or the sub-graph is not closed (a node inside has a
    /// predecessor outside, or already belongs to another composite).
    pub fn add_composite(
        &mut self,
        name: impl Into<String>,
        sources: impl IntoIterator<Item = NodeId>,
        sink: NodeId,
    ) -> Result<NodeId> {
        let name = name.into();
        let composite = CompositeNode::new(sources, sink);
        let invalid = |reason: String| FlowError::InvalidComposite {
            name: name.clone(),
            reason,
        };

        if composite.sources().is_empty() {
            return Err(invalid("no sources".to_string()));
        }
        for &id in composite.sources().iter().chain(std::iter::once(&sink)) {
            if id.index() >= self.nodes.len() {
                return Err(FlowError::UnknownNode(id));
            }
        }

        let inner: HashSet<NodeId> = OneShotLevelOrder::new(self, composite.sources()).collect();
        if !inner.contains(&sink) {
            return Err(invalid(format!("sink {} is not reachable from sources", sink)));
        }
        for &id in &inner {
            let node = &self.nodes[id.index()];
            if let Some(owner) = node.owner() {
                return Err(invalid(format!(
                    "{} already belongs to composite {}",
                    id, owner
                )));
            }
            if let Some(outside) = node.predecessors().find(|p| !inner.contains(p)) {
                return Err(invalid(format!(
                    "{} has predecessor {} outside the sub-graph",
                    id, outside
                )));
            }
        }

        let inner_count = inner.len();
        let id = self.push_node(Node::new(name, NodeKind::Composite(composite)));
        for inner_id in inner {
            self.nodes[inner_id.index()].set_owner(id);
        }

        tracing::debug!(
            "Added composite {:?} '{}' wrapping {} inner nodes",
            id,
            self.nodes[id.index()].name(),
            inner_count
        );
        Ok(id)
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Connect `from → to` with a fresh link, registered on both endpoints.
    /// Connecting an existing edge again returns its link.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<LinkId> {
        let from_owner = self.node(from)?.owner();
        let to_owner = self.node(to)?.owner();
        if from_owner != to_owner {
            return Err(FlowError::InvalidEdge(format!(
                "{} and {} belong to different graphs",
                from, to
            )));
        }
        if let Ok(existing) = self.nodes[from.index()].outbound_link(from, to) {
            return Ok(existing);
        }

        let id = LinkId(self.links.len() as u32);
        self.links.push(Link::new(from, to));
        self.nodes[from.index()].add_successor(to, id);
        self.nodes[to.index()].add_predecessor(from, id);

        tracing::trace!("Connected {:?} -> {:?} via {:?}", from, to, id);
        Ok(id)
    }

    /// Remove the edge `from → to`. The link stays in the arena but is no
    /// longer reachable from either node.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.node(to)?;
        let link = self
            .node_mut(from)?
            .remove_successor(to)
            .ok_or(FlowError::NotAdjacent {
                node: from,
                neighbor: to,
            })?;
        self.nodes[to.index()].remove_predecessor(from);

        tracing::trace!("Disconnected {:?} -> {:?} ({:?})", from, to, link);
        Ok(())
    }

    // ── Accessors ──

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.index()).ok_or(FlowError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(FlowError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Wrapped unit of a plain node.
    pub fn plain(&self, id: NodeId) -> Result<&PlainNode> {
        match self.node(id)?.kind() {
            NodeKind::Plain(plain) => Ok(plain),
            NodeKind::Composite(_) => Err(FlowError::WrongKind {
                node: id,
                expected: "plain",
            }),
        }
    }

    pub fn composite(&self, id: NodeId) -> Result<&CompositeNode> {
        match self.node(id)?.kind() {
            NodeKind::Composite(composite) => Ok(composite),
            NodeKind::Plain(_) => Err(FlowError::WrongKind {
                node: id,
                expected: "composite",
            }),
        }
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index())
    }

    /// Link carrying data from `neighbor` into `node`.
    pub fn inbound_link(&self, node: NodeId, neighbor: NodeId) -> Result<&Link> {
        let id = self.node(node)?.inbound_link(node, neighbor)?;
        Ok(&self.links[id.index()])
    }

    /// Link carrying data from `node` to `neighbor`.
    pub fn outbound_link(&self, node: NodeId, neighbor: NodeId) -> Result<&Link> {
        let id = self.node(node)?.outbound_link(node, neighbor)?;
        Ok(&self.links[id.index()])
    }

    /// Successors of `id`; empty for unknown ids.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(id.index())
            .into_iter()
            .flat_map(|node| node.successors())
    }

    /// Whether any inbound link, ignoring a self-loop, holds a batch.
    pub fn has_inbound_data(&self, id: NodeId) -> Result<bool> {
        Ok(self
            .node(id)?
            .inbound_links()
            .any(|(pred, link)| pred != id && !self.links[link.index()].is_empty()))
    }

    /// Whether any attached link other than a self-loop holds a non-empty
    /// batch. Queued empty batches do not count.
    pub fn has_pending_values(&self) -> bool {
        self.nodes.iter().enumerate().any(|(idx, node)| {
            node.outbound_links().any(|(succ, link)| {
                succ.index() != idx && self.links[link.index()].holds_values()
            })
        })
    }

    pub fn unit_name(&self, id: UnitId) -> Option<&str> {
        self.units.get(id.index()).map(|slot| slot.name.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Nodes not owned by any composite.
    pub fn top_level_nodes(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|id| self.nodes[id.index()].owner().is_none())
            .collect()
    }

    /// Top-level nodes without predecessors.
    pub fn sources(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|id| {
                let node = &self.nodes[id.index()];
                node.owner().is_none() && !node.has_predecessors()
            })
            .collect()
    }

    /// Node by name, first match in id order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name() == name)
            .map(|idx| NodeId(idx as u32))
    }

    // ── Data helpers for drivers ──

    /// Queue `batch` on the edge `from → to`.
    pub fn push_to(&mut self, from: NodeId, to: NodeId, batch: Batch) -> Result<()> {
        let id = self.node(from)?.outbound_link(from, to)?;
        self.links[id.index()].push(batch);
        Ok(())
    }

    /// Take every batch queued on the edge `from → to`, oldest first.
    pub fn drain_link(&mut self, from: NodeId, to: NodeId) -> Result<Vec<Batch>> {
        let id = self.node(from)?.outbound_link(from, to)?;
        Ok(self.links[id.index()].drain())
    }

    /// Batches queued on the edge `from → to`.
    pub fn pending(&self, from: NodeId, to: NodeId) -> Result<usize> {
        Ok(self.outbound_link(from, to)?.len())
    }

    /// Poll one batch from every non-empty inbound link of `id`, appending its
    /// values to `input` in predecessor order. Returns whether a link other
    /// than a self-loop still holds data afterwards.
    pub(crate) fn fetch_inputs(&mut self, id: NodeId, input: &mut Vec<Value>) -> Result<bool> {
        let Graph { nodes, links, .. } = self;
        let node = nodes.get(id.index()).ok_or(FlowError::UnknownNode(id))?;
        let mut remaining = false;
        for (pred, link_id) in node.inbound_links() {
            let link = &mut links[link_id.index()];
            if let Some(batch) = link.poll() {
                tracing::trace!("{:?} pulled {} values from {:?}", id, batch.len(), pred);
                input.extend(batch.into_inner());
            }
            if pred != id && !link.is_empty() {
                remaining = true;
            }
        }
        Ok(remaining)
    }

    /// Push a copy of `batch` onto every outbound link of `id`.
    pub(crate) fn emit_outputs(&mut self, id: NodeId, batch: &Batch) -> Result<()> {
        let Graph { nodes, links, .. } = self;
        let node = nodes.get(id.index()).ok_or(FlowError::UnknownNode(id))?;
        for (succ, link_id) in node.outbound_links() {
            tracing::trace!("{:?} pushed {} values to {:?}", id, batch.len(), succ);
            links[link_id.index()].push(batch.clone());
        }
        Ok(())
    }

    // ── Dispatch ──

    /// Double dispatch: hand `id` to the visitor method matching its variant.
    pub fn visit<V: Visitor + ?Sized>(&mut self, id: NodeId, visitor: &mut V) -> Result<bool> {
        match self.node(id)?.kind() {
            NodeKind::Plain(_) => visitor.visit_plain_node(self, id),
            NodeKind::Composite(_) => visitor.visit_composite_node(self, id),
        }
    }

    // ── Unit invocation ──

    fn unit_slot_mut(&mut self, id: UnitId) -> Result<&mut UnitSlot> {
        self.units.get_mut(id.index()).ok_or(FlowError::UnknownUnit(id))
    }

    pub(crate) fn set_up_unit(&mut self, node: NodeId, unit: UnitId) -> Result<()> {
        let slot = self.unit_slot_mut(unit)?;
        slot.unit
            .set_up()
            .map_err(|e| FlowError::unit(node, slot.name.clone(), Stage::SetUp, e))
    }

    pub(crate) fn dismantle_unit(&mut self, node: NodeId, unit: UnitId) -> Result<()> {
        let slot = self.unit_slot_mut(unit)?;
        slot.unit
            .dismantle()
            .map_err(|e| FlowError::unit(node, slot.name.clone(), Stage::Dismantle, e))
    }

    pub(crate) fn process_unit(
        &mut self,
        node: NodeId,
        unit: UnitId,
        inputs: &[Value],
        outputs: &mut Vec<Value>,
    ) -> Result<()> {
        let slot = self.unit_slot_mut(unit)?;
        slot.unit
            .process(inputs, outputs)
            .map_err(|e| FlowError::unit(node, slot.name.clone(), Stage::Process, e))
    }
}
