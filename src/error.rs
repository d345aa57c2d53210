//! Error handling for dataflow-rs
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the engine. Units report their own failures through
//! `anyhow::Result`; the engine wraps them into [`FlowError::Unit`] together
//! with the node, the unit name and the lifecycle stage that failed.

use crate::pipeline::id::{NodeId, UnitId};
use std::fmt;
use thiserror::Error;

/// Lifecycle stage in which a unit was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SetUp,
    Process,
    Dismantle,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::SetUp => write!(f, "set-up"),
            Stage::Process => write!(f, "process"),
            Stage::Dismantle => write!(f, "dismantle"),
        }
    }
}

/// Main error type for dataflow-rs operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// A unit failed; the current pass is aborted.
    #[error("Unit '{unit}' failed during {stage} at {node}: {source}")]
    Unit {
        node: NodeId,
        unit: String,
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Link lookup for a node that is not a neighbour.
    #[error("{neighbor} is not adjacent to {node}")]
    NotAdjacent { node: NodeId, neighbor: NodeId },

    #[error("Invalid edge: {0}")]
    InvalidEdge(String),

    /// Node exists but is of the other variant.
    #[error("{node} is not a {expected} node")]
    WrongKind { node: NodeId, expected: &'static str },

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Unknown unit {0}")]
    UnknownUnit(UnitId),

    /// Composite rejected during assembly.
    #[error("Invalid composite '{name}': {reason}")]
    InvalidComposite { name: String, reason: String },

    /// Operation the receiver deliberately does not support.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FlowError>,
    },
}

impl FlowError {
    /// Wrap a unit failure.
    pub fn unit(node: NodeId, unit: impl Into<String>, stage: Stage, err: anyhow::Error) -> Self {
        FlowError::Unit {
            node,
            unit: unit.into(),
            stage,
            source: err.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FlowError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stage of the unit failure, looking through any context layers.
    pub fn unit_stage(&self) -> Option<Stage> {
        match self {
            FlowError::Unit { stage, .. } => Some(*stage),
            FlowError::WithContext { source, .. } => source.unit_stage(),
            _ => None,
        }
    }
}

/// Result type alias for dataflow-rs operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
