//! The full closure, cycled forever.

use super::{LevelOrder, OneShotLevelOrder};
use crate::pipeline::graph::Graph;
use crate::pipeline::id::NodeId;

/// Computes the complete reachable list once, then yields it over and over
/// in the same order. Holds no borrow of the graph after construction.
#[derive(Debug, Clone)]
pub struct RepeatedLevelOrder {
    order: Vec<NodeId>,
    cursor: usize,
    round: u64,
    started: bool,
}

impl RepeatedLevelOrder {
    pub fn new(graph: &Graph, sources: &[NodeId]) -> Self {
        Self {
            order: OneShotLevelOrder::new(graph, sources).collect(),
            cursor: 0,
            round: 0,
            started: false,
        }
    }

    /// The fixed list being cycled.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }
}

impl Iterator for RepeatedLevelOrder {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor == self.order.len() {
            self.cursor = 0;
        }
        if self.cursor == 0 && self.started {
            self.round += 1;
        }
        self.started = true;
        let id = self.order[self.cursor];
        self.cursor += 1;
        Some(id)
    }
}

impl LevelOrder for RepeatedLevelOrder {
    /// Always true unless the iterator was seeded with no known source.
    fn has_next(&self) -> bool {
        !self.order.is_empty()
    }

    fn round(&self) -> u64 {
        self.round
    }
}
