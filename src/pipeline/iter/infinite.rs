//! Endless traversal over an ever-growing depth window.

use super::{levels, LevelOrder};
use crate::pipeline::graph::Graph;
use crate::pipeline::id::NodeId;

/// Round *k* emits level *k* followed by every node of levels *k−1 … 0*.
/// Once no new level exists, each round re-emits the whole reachable set.
///
/// With the diamond `A → {B, C} → D` the rounds are `[A]`, `[B, C, A]`,
/// `[D, B, C, A]`, `[D, B, C, A]`, …
#[derive(Debug, Clone)]
pub struct InfiniteLevelOrder {
    levels: Vec<Vec<NodeId>>,
    /// Levels already folded into `window`.
    discovered: usize,
    /// Cumulative round list, newest level first.
    window: Vec<NodeId>,
    cursor: usize,
    round: u64,
}

impl InfiniteLevelOrder {
    pub fn new(graph: &Graph, sources: &[NodeId]) -> Self {
        let levels = levels(graph, sources);
        let window = levels.first().cloned().unwrap_or_default();
        Self {
            discovered: levels.len().min(1),
            levels,
            window,
            cursor: 0,
            round: 0,
        }
    }

    /// Nodes emitted per round at this point.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    fn start_round(&mut self) {
        if let Some(level) = self.levels.get(self.discovered) {
            let mut window = level.clone();
            window.extend_from_slice(&self.window);
            self.window = window;
            self.discovered += 1;
        }
        self.cursor = 0;
        self.round += 1;
    }
}

impl Iterator for InfiniteLevelOrder {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.window.is_empty() {
            return None;
        }
        if self.cursor == self.window.len() {
            self.start_round();
        }
        let id = self.window[self.cursor];
        self.cursor += 1;
        Some(id)
    }
}

impl LevelOrder for InfiniteLevelOrder {
    /// Always true unless the iterator was seeded with no known source.
    fn has_next(&self) -> bool {
        !self.window.is_empty()
    }

    fn round(&self) -> u64 {
        self.round
    }
}
