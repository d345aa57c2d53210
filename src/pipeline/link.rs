//! FIFO conduit between two adjacent nodes.

use crate::pipeline::id::NodeId;
use crate::pipeline::value::Batch;
use std::collections::VecDeque;

/// Unbounded, non-blocking queue of batches for the edge `from → to`.
///
/// A link is created once per edge and referenced by both endpoints through
/// the same `LinkId`; it is drained and refilled, never replaced.
#[derive(Debug, Clone)]
pub struct Link {
    from: NodeId,
    to: NodeId,
    queue: VecDeque<Batch>,
}

impl Link {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            queue: VecDeque::new(),
        }
    }

    /// Upstream endpoint.
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Downstream endpoint.
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Whether the link connects a node to itself.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Append a batch at the back.
    #[inline]
    pub fn push(&mut self, batch: Batch) {
        self.queue.push_back(batch);
    }

    /// Remove and return the oldest batch, `None` when empty.
    #[inline]
    pub fn poll(&mut self) -> Option<Batch> {
        self.queue.pop_front()
    }

    /// Oldest batch without removing it.
    pub fn peek(&self) -> Option<&Batch> {
        self.queue.front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued batches.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether any queued batch carries at least one value.
    pub fn holds_values(&self) -> bool {
        self.queue.iter().any(|batch| !batch.is_empty())
    }

    /// Remove every queued batch, oldest first.
    pub fn drain(&mut self) -> Vec<Batch> {
        self.queue.drain(..).collect()
    }
}
