//! # dataflow-rs: synchronous dataflow graph engine
//!
//! A directed graph of processing units connected by buffered links, driven
//! by visitors. The engine supports feedback loops, composite nodes wrapping
//! a private sub-graph, units shared by several nodes, and three level-order
//! traversal disciplines.
//!
//! ## Architecture
//!
//! - **Graph**: arena of nodes, links and units ([`pipeline::Graph`])
//! - **Iterators**: one-shot, infinite and repeated level-order traversals
//! - **Visitors**: setting-up, processing and dismantling passes
//! - **Runner**: drives a full run from a [`config::RunnerConfig`]
//!
//! ## Example
//!
//! ```
//! use dataflow_rs::batch;
//! use dataflow_rs::pipeline::{Graph, Passthrough, Recorder, Runner, Sequence};
//!
//! fn main() -> dataflow_rs::Result<()> {
//!     let mut graph = Graph::new();
//!     let source = graph.add_unit_node("source", Sequence::new(vec![batch![23, "hello"]]));
//!     let relay = graph.add_unit_node("relay", Passthrough);
//!     let (recorder, seen) = Recorder::new();
//!     let sink = graph.add_unit_node("sink", recorder);
//!     graph.connect(source, relay)?;
//!     graph.connect(relay, sink)?;
//!
//!     let report = Runner::default().run(&mut graph)?;
//!     assert_eq!(report.visits, 3);
//!     assert_eq!(seen.batches(), vec![batch![23, "hello"]]);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use config::{RunnerConfig, TraversalMode};
pub use error::{FlowError, Result, ResultExt, Stage};
pub use pipeline::{Batch, Graph, NodeId, RunReport, Runner, StopReason, Unit, Value};
