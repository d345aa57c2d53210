//! Level-order traversals over the graph.
//!
//! All three variants seed a breadth-first search with a de-duplicated set of
//! sources and emit nodes by increasing distance from the nearest source.
//! Visited nodes are closed, so a node is expanded at most once and cycles
//! terminate. Within one level nodes come out in the order they were
//! discovered, which is deterministic for a given graph.
//!
//! The levels are computed when the iterator is built and the iterator keeps
//! no borrow of the graph, so a driver can visit (and mutate link contents)
//! while iterating. Structural edits made afterwards are not observed.
//!
//! | Variant | Ends? | Repeat policy |
//! |---|---|---|
//! | [`OneShotLevelOrder`] | yes | each reachable node once |
//! | [`InfiniteLevelOrder`] | no | round *k* emits level *k*, then every earlier level |
//! | [`RepeatedLevelOrder`] | no | the full closure, cycled forever |

mod infinite;
mod one_shot;
mod repeated;

pub use infinite::InfiniteLevelOrder;
pub use one_shot::OneShotLevelOrder;
pub use repeated::RepeatedLevelOrder;

use crate::error::{FlowError, Result};
use crate::pipeline::graph::Graph;
use crate::pipeline::id::NodeId;
use std::collections::HashSet;

/// Common surface of the level-order iterators.
pub trait LevelOrder: Iterator<Item = NodeId> {
    /// Whether `next` will produce another node.
    fn has_next(&self) -> bool;

    /// Index of the round the most recently returned node belongs to.
    /// Single-pass iterators stay in round 0.
    fn round(&self) -> u64;

    /// Iterators are read-only views; removal always fails.
    fn remove(&mut self) -> Result<()> {
        Err(FlowError::Unsupported("remove from a level-order iterator"))
    }
}

/// De-duplicate `sources`, dropping ids the graph does not know.
fn seed(graph: &Graph, sources: &[NodeId], visited: &mut HashSet<NodeId>) -> Vec<NodeId> {
    let mut level = Vec::with_capacity(sources.len());
    for &id in sources {
        if !graph.contains(id) {
            tracing::debug!("Ignoring unknown source {:?}", id);
            continue;
        }
        if visited.insert(id) {
            level.push(id);
        }
    }
    level
}

/// Breadth-first levels reachable from `sources`. Every level is non-empty.
fn levels(graph: &Graph, sources: &[NodeId]) -> Vec<Vec<NodeId>> {
    let mut visited = HashSet::new();
    let mut levels = Vec::new();
    let mut level = seed(graph, sources, &mut visited);
    while !level.is_empty() {
        let next = expand(graph, &level, &mut visited);
        levels.push(level);
        level = next;
    }
    levels
}

/// Successors of `level` not seen before, marking them visited.
fn expand(graph: &Graph, level: &[NodeId], visited: &mut HashSet<NodeId>) -> Vec<NodeId> {
    let mut next = Vec::new();
    for &id in level {
        for succ in graph.successors(id) {
            if visited.insert(succ) {
                next.push(succ);
            }
        }
    }
    next
}
