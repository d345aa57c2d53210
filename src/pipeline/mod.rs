//! Synchronous dataflow graph.
//!
//! Units of work sit in plain nodes, connected by FIFO links carrying
//! batches of values. Composite nodes wrap a private sub-graph behind the
//! same edge contract. Visitors do the work: they are handed nodes by a
//! level-order iterator and dispatched per node variant.
//!
//! # Architecture
//!
//! ```text
//! [Sequence] ──► [Composite ( P21 ──► P22 )] ──► [Recorder]
//!                                         └─────► [Passthrough] ─┐
//!                                                      ▲         │
//!                                                      └─────────┘ (self-loop)
//! ```
//!
//! # Design
//!
//! - **Arena storage**: nodes, links and units live in flat vectors inside
//!   [`Graph`] and are addressed by `NodeId`, `LinkId` and `UnitId`.
//! - **Shared links**: one link per edge, referenced by both endpoints.
//! - **Closed node set**: [`NodeKind`] is matched exhaustively; visitors
//!   implement one method per variant.
//! - **Lifecycle dedup by unit**: set-up and dismantling happen once per
//!   `UnitId`, however many nodes wrap the unit.
//! - **Single-threaded**: one traversal at a time, structural edits only
//!   between passes.

pub mod graph;
pub mod id;
pub mod iter;
pub mod link;
pub mod node;
pub mod runner;
pub mod snapshot;
pub mod unit;
pub mod units;
pub mod value;
pub mod visitor;

pub use graph::Graph;
pub use id::{LinkId, NodeId, UnitId};
pub use iter::{InfiniteLevelOrder, LevelOrder, OneShotLevelOrder, RepeatedLevelOrder};
pub use link::Link;
pub use node::{CompositeNode, Node, NodeKind, PlainNode};
pub use runner::{RunReport, Runner, StopReason};
pub use snapshot::{LinkSnapshot, NodeKindSnapshot, NodeSnapshot, TopologySnapshot};
pub use unit::Unit;
pub use units::{FnUnit, Passthrough, Recorder, RecorderHandle, Sequence};
pub use value::{Batch, Value};
pub use visitor::{DismantlingVisitor, ProcessingVisitor, SettingUpVisitor, Visitor};
