//! Processing visitor: one execution pass per visit.
//!
//! # Plain nodes
//!
//! A node is eligible when it is a source (no predecessors) or when an
//! inbound link other than a self-loop holds data. While eligible it pulls
//! one batch from every non-empty inbound link, merges them into a single
//! input, runs its unit and pushes the output to every outbound link, even
//! when the output is empty. A self-loop batch is merged with the next fresh
//! input but never keeps the node running on its own.
//!
//! # Composite nodes
//!
//! Each fetched external batch runs the inner graph once in one-shot level
//! order. Inner sources receive the external batch as extra input, and every
//! batch the inner sink produces is forwarded to the composite's outbound
//! links. The external batch and the sink capture are passed down as call
//! arguments, so nested composites each work on their own buffers.

use super::{inner_order, Visitor};
use crate::error::Result;
use crate::pipeline::graph::Graph;
use crate::pipeline::id::{NodeId, UnitId};
use crate::pipeline::node::NodeKind;
use crate::pipeline::value::{Batch, Value};

/// Pulls inputs, runs units and pushes outputs.
///
/// `visit_plain_node` returns `true` for nodes with predecessors. A source
/// returns `true` only if it produced at least one non-empty batch, so a
/// driver can tell when every source has gone quiet.
/// `visit_composite_node` always returns `true`.
#[derive(Debug, Default)]
pub struct ProcessingVisitor {
    /// Composite nesting of the node currently being processed.
    depth: usize,
    executions: u64,
}

impl ProcessingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `process` calls made through this visitor.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    fn run_node(
        &mut self,
        graph: &mut Graph,
        id: NodeId,
        injected: Option<&Batch>,
        capture: Option<&mut Vec<Batch>>,
    ) -> Result<bool> {
        let unit = match graph.node(id)?.kind() {
            NodeKind::Plain(plain) => Some(plain.unit()),
            NodeKind::Composite(_) => None,
        };
        match unit {
            Some(unit) => self.run_plain(graph, id, unit, injected, capture),
            None => self.run_composite(graph, id, injected, capture),
        }
    }

    fn run_plain(
        &mut self,
        graph: &mut Graph,
        id: NodeId,
        unit: UnitId,
        mut injected: Option<&Batch>,
        mut capture: Option<&mut Vec<Batch>>,
    ) -> Result<bool> {
        let has_predecessors = graph.node(id)?.has_predecessors();
        let mut looping =
            !has_predecessors || injected.is_some() || graph.has_inbound_data(id)?;
        if !looping {
            tracing::trace!("{:?} starved, skipping", id);
        }

        let mut input: Vec<Value> = Vec::new();
        let mut output: Vec<Value> = Vec::new();
        let mut produced = false;

        while looping {
            if let Some(batch) = injected.take() {
                input.extend_from_slice(batch.as_slice());
            }
            looping = graph.fetch_inputs(id, &mut input)?;

            graph.process_unit(id, unit, &input, &mut output)?;
            self.executions += 1;

            let batch = Batch::from(std::mem::take(&mut output));
            produced |= !batch.is_empty();
            graph.emit_outputs(id, &batch)?;
            if let Some(capture) = capture.as_deref_mut() {
                capture.push(batch);
            }
            input.clear();
        }

        Ok(has_predecessors || produced)
    }

    fn run_composite(
        &mut self,
        graph: &mut Graph,
        id: NodeId,
        mut injected: Option<&Batch>,
        mut capture: Option<&mut Vec<Batch>>,
    ) -> Result<bool> {
        let has_predecessors = graph.node(id)?.has_predecessors();
        let mut looping =
            !has_predecessors || injected.is_some() || graph.has_inbound_data(id)?;
        if !looping {
            return Ok(true);
        }

        let (sources, sink) = {
            let composite = graph.composite(id)?;
            (composite.sources().to_vec(), composite.sink())
        };
        let order = inner_order(graph, id)?;
        tracing::debug!(
            "Entering composite {:?} at depth {} ({} inner nodes)",
            id,
            self.depth,
            order.len()
        );

        let mut input: Vec<Value> = Vec::new();
        while looping {
            if let Some(batch) = injected.take() {
                input.extend_from_slice(batch.as_slice());
            }
            looping = graph.fetch_inputs(id, &mut input)?;
            let external = Batch::from(std::mem::take(&mut input));

            let mut sink_output: Vec<Batch> = Vec::new();
            self.depth += 1;
            let result =
                self.run_inner(graph, &order, &sources, sink, &external, &mut sink_output);
            self.depth -= 1;
            result?;

            for batch in sink_output {
                graph.emit_outputs(id, &batch)?;
                if let Some(capture) = capture.as_deref_mut() {
                    capture.push(batch);
                }
            }
        }

        Ok(true)
    }

    fn run_inner(
        &mut self,
        graph: &mut Graph,
        order: &[NodeId],
        sources: &[NodeId],
        sink: NodeId,
        external: &Batch,
        sink_output: &mut Vec<Batch>,
    ) -> Result<()> {
        for &inner in order {
            let injected = sources.contains(&inner).then_some(external);
            let capture = (inner == sink).then_some(&mut *sink_output);
            self.run_node(graph, inner, injected, capture)?;
        }
        Ok(())
    }
}

impl Visitor for ProcessingVisitor {
    fn visit_plain_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool> {
        let unit = graph.plain(id)?.unit();
        self.run_plain(graph, id, unit, None, None)
    }

    fn visit_composite_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool> {
        self.run_composite(graph, id, None, None)
    }
}
