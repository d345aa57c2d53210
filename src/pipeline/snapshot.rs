//! Serializable view of the graph structure.
//!
//! A snapshot captures nodes, links with their pending batch counts, and
//! composite membership. It is a copy: later changes to the graph are not
//! reflected.

use crate::error::{FlowError, Result};
use crate::pipeline::graph::Graph;
use crate::pipeline::id::{LinkId, NodeId, UnitId};
use crate::pipeline::node::NodeKind;
use serde::{Deserialize, Serialize};

/// Variant-specific part of a [`NodeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKindSnapshot {
    Plain { unit: UnitId, unit_name: String },
    Composite { sources: Vec<NodeId>, sink: NodeId },
}

/// Snapshot of a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKindSnapshot,
    pub owner: Option<NodeId>,
    pub predecessors: Vec<NodeId>,
    pub successors: Vec<NodeId>,
}

/// Snapshot of a single link still attached to both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    pub pending: usize,
}

/// Complete topology snapshot of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub links: Vec<LinkSnapshot>,
}

impl TopologySnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Total batches waiting on all links.
    pub fn pending_batches(&self) -> usize {
        self.links.iter().map(|l| l.pending).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FlowError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FlowError::Serialization(e.to_string()))
    }
}

impl Graph {
    /// Capture the current structure of the graph.
    pub fn snapshot(&self) -> TopologySnapshot {
        let mut snapshot = TopologySnapshot::default();
        for id in self.node_ids() {
            let Ok(node) = self.node(id) else { continue };
            let kind = match node.kind() {
                NodeKind::Plain(plain) => NodeKindSnapshot::Plain {
                    unit: plain.unit(),
                    unit_name: self.unit_name(plain.unit()).unwrap_or_default().to_string(),
                },
                NodeKind::Composite(composite) => NodeKindSnapshot::Composite {
                    sources: composite.sources().to_vec(),
                    sink: composite.sink(),
                },
            };
            snapshot.nodes.push(NodeSnapshot {
                id,
                name: node.name().to_string(),
                kind,
                owner: node.owner(),
                predecessors: node.predecessors().collect(),
                successors: node.successors().collect(),
            });
            for (to, link_id) in node.outbound_links() {
                if let Some(link) = self.link(link_id) {
                    snapshot.links.push(LinkSnapshot {
                        id: link_id,
                        from: id,
                        to,
                        pending: link.len(),
                    });
                }
            }
        }
        snapshot
    }
}
