//! Single pass, each reachable node exactly once.

use super::{levels, LevelOrder};
use crate::pipeline::graph::Graph;
use crate::pipeline::id::NodeId;

/// Breadth-first traversal that ends once the frontier is exhausted.
#[derive(Debug, Clone)]
pub struct OneShotLevelOrder {
    levels: Vec<Vec<NodeId>>,
    level: usize,
    pos: usize,
    depth: usize,
}

impl OneShotLevelOrder {
    pub fn new(graph: &Graph, sources: &[NodeId]) -> Self {
        Self {
            levels: levels(graph, sources),
            level: 0,
            pos: 0,
            depth: 0,
        }
    }

    /// Depth of the node most recently returned by `next`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of non-empty levels in the closure.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

impl Iterator for OneShotLevelOrder {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(level) = self.levels.get(self.level) {
            if let Some(&id) = level.get(self.pos) {
                self.pos += 1;
                self.depth = self.level;
                return Some(id);
            }
            self.level += 1;
            self.pos = 0;
        }
        None
    }
}

impl LevelOrder for OneShotLevelOrder {
    fn has_next(&self) -> bool {
        match self.levels.get(self.level) {
            Some(level) => self.pos < level.len() || self.level + 1 < self.levels.len(),
            None => false,
        }
    }

    fn round(&self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::units::Passthrough;

    #[test]
    fn test_diamond_levels() {
        // Shape: A -> B, A -> C, B -> D, C -> D
        let mut g = Graph::new();
        let a = g.add_unit_node("A", Passthrough);
        let b = g.add_unit_node("B", Passthrough);
        let c = g.add_unit_node("C", Passthrough);
        let d = g.add_unit_node("D", Passthrough);
        g.connect(a, b).unwrap();
        g.connect(a, c).unwrap();
        g.connect(b, d).unwrap();
        g.connect(c, d).unwrap();

        let mut it = OneShotLevelOrder::new(&g, &[a]);
        assert_eq!(it.level_count(), 3);

        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        while it.has_next() {
            let id = it.next().unwrap();
            if levels.len() <= it.depth() {
                levels.push(Vec::new());
            }
            levels[it.depth()].push(id);
        }

        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0], vec![a]);
        let mut middle = levels[1].clone();
        middle.sort();
        assert_eq!(middle, vec![b, c]);
        assert_eq!(levels[2], vec![d]);
        assert!(!it.has_next());
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut g = Graph::new();
        let a = g.add_unit_node("A", Passthrough);
        let b = g.add_unit_node("B", Passthrough);
        g.connect(a, b).unwrap();
        g.connect(b, a).unwrap();
        g.connect(b, b).unwrap();

        let order: Vec<NodeId> = OneShotLevelOrder::new(&g, &[a]).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_duplicate_sources_are_seeded_once() {
        let mut g = Graph::new();
        let a = g.add_unit_node("A", Passthrough);
        let b = g.add_unit_node("B", Passthrough);
        g.connect(a, b).unwrap();

        let order: Vec<NodeId> = OneShotLevelOrder::new(&g, &[a, a, b]).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_empty_seed() {
        let g = Graph::new();
        let mut it = OneShotLevelOrder::new(&g, &[]);
        assert!(!it.has_next());
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_unknown_sources_are_dropped() {
        let mut g = Graph::new();
        let a = g.add_unit_node("A", Passthrough);
        let order: Vec<NodeId> = OneShotLevelOrder::new(&g, &[NodeId(42), a]).collect();
        assert_eq!(order, vec![a]);
    }

    #[test]
    fn test_nearest_source_wins() {
        // A -> B -> C and a second source S -> C: C sits at depth 1.
        let mut g = Graph::new();
        let a = g.add_unit_node("A", Passthrough);
        let b = g.add_unit_node("B", Passthrough);
        let c = g.add_unit_node("C", Passthrough);
        let s = g.add_unit_node("S", Passthrough);
        g.connect(a, b).unwrap();
        g.connect(b, c).unwrap();
        g.connect(s, c).unwrap();

        let mut it = OneShotLevelOrder::new(&g, &[a, s]);
        let mut depth_of = std::collections::HashMap::new();
        while let Some(id) = it.next() {
            depth_of.insert(id, it.depth());
        }
        assert_eq!(depth_of[&c], 1);
        assert_eq!(depth_of[&b], 1);
    }
}
