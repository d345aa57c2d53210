//! Graph driver: set up, process until a stop condition, dismantle.
//!
//! ```text
//! SettingUpVisitor ──► ProcessingVisitor × N ──► DismantlingVisitor
//!                       (order from the configured level-order iterator)
//! ```
//!
//! Processing stops when the iterator ends, when the visit budget is used up,
//! or, with `stop_when_silent`, after a full round in which every visited
//! source produced nothing and no link is left holding values.

use crate::config::{RunnerConfig, TraversalMode};
use crate::error::{Result, ResultExt};
use crate::pipeline::graph::Graph;
use crate::pipeline::id::NodeId;
use crate::pipeline::iter::{
    InfiniteLevelOrder, LevelOrder, OneShotLevelOrder, RepeatedLevelOrder,
};
use crate::pipeline::visitor::{DismantlingVisitor, ProcessingVisitor, SettingUpVisitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Why processing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The iterator had no more nodes.
    Exhausted,
    /// A full round passed with every source silent and no values in flight.
    Silent,
    /// `max_visits` was reached.
    Budget,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "exhausted"),
            StopReason::Silent => write!(f, "silent"),
            StopReason::Budget => write!(f, "budget"),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Processing visits made by the driver (inner composite nodes excluded).
    pub visits: u64,
    /// Rounds in which at least one node was visited.
    pub rounds: u64,
    /// Unit `process` calls, inner composite nodes included.
    pub executions: u64,
    pub stop_reason: StopReason,
}

/// Drives a whole graph according to a [`RunnerConfig`].
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Set up, process, dismantle.
    ///
    /// A set-up failure is returned immediately. Once processing has started,
    /// dismantling runs whatever the outcome; a processing error takes
    /// precedence over a dismantling error.
    pub fn run(&self, graph: &mut Graph) -> Result<RunReport> {
        self.config.validate()?;
        tracing::info!(
            "Starting {} run over {} nodes ({} sources)",
            self.config.traversal,
            graph.node_count(),
            graph.sources().len()
        );

        if self.config.set_up {
            Self::set_up(graph).context("Setting up graph")?;
        }

        let outcome = self.process(graph);

        if self.config.dismantle {
            if let Err(e) = Self::dismantle(graph) {
                match outcome {
                    Ok(_) => return Err(e.with_context("Dismantling graph")),
                    Err(_) => tracing::warn!("Dismantling after a failed run also failed: {}", e),
                }
            }
        }

        let report = outcome.context("Processing graph")?;
        tracing::info!(
            "Run stopped ({}) after {} visits in {} rounds, {} executions",
            report.stop_reason,
            report.visits,
            report.rounds,
            report.executions
        );
        Ok(report)
    }

    /// Run the setting-up visitor over every top-level node.
    pub fn set_up(graph: &mut Graph) -> Result<()> {
        let mut visitor = SettingUpVisitor::new();
        for id in graph.top_level_nodes() {
            graph.visit(id, &mut visitor)?;
        }
        tracing::debug!("Set up {} units", visitor.handled_count());
        Ok(())
    }

    /// Run the dismantling visitor over every top-level node.
    pub fn dismantle(graph: &mut Graph) -> Result<()> {
        let mut visitor = DismantlingVisitor::new();
        for id in graph.top_level_nodes() {
            graph.visit(id, &mut visitor)?;
        }
        tracing::debug!("Dismantled {} units", visitor.handled_count());
        Ok(())
    }

    /// Processing visits only, without lifecycle passes.
    pub fn process(&self, graph: &mut Graph) -> Result<RunReport> {
        self.config.validate()?;
        let sources = graph.sources();
        let source_set: HashSet<NodeId> = sources.iter().copied().collect();
        let mut order = self.iterator(graph, &sources);
        let mut visitor = ProcessingVisitor::new();

        let mut visits = 0u64;
        let mut rounds = 0u64;
        let mut current_round: Option<u64> = None;
        // Whether any source ran / produced data in the current round.
        let mut saw_source = false;
        let mut sources_live = false;

        let stop_reason = loop {
            if visits >= self.config.max_visits {
                if !self.config.traversal.is_bounded() && !self.config.stop_when_silent {
                    tracing::debug!("Visit budget of {} used up", self.config.max_visits);
                } else {
                    tracing::warn!(
                        "Run stopped by visit budget ({}) before going quiet",
                        self.config.max_visits
                    );
                }
                break StopReason::Budget;
            }
            let Some(id) = order.next() else {
                break StopReason::Exhausted;
            };

            let round = order.round();
            if current_round != Some(round) {
                if current_round.is_some()
                    && self.config.stop_when_silent
                    && saw_source
                    && !sources_live
                    && !graph.has_pending_values()
                {
                    tracing::debug!("All sources silent during round {}", rounds);
                    break StopReason::Silent;
                }
                current_round = Some(round);
                rounds += 1;
                saw_source = false;
                sources_live = false;
            }

            let live = graph
                .visit(id, &mut visitor)
                .with_context(|| format!("Visiting {:?} in round {}", id, round))?;
            visits += 1;
            if source_set.contains(&id) {
                saw_source = true;
                sources_live |= live;
            }
        };

        Ok(RunReport {
            visits,
            rounds,
            executions: visitor.executions(),
            stop_reason,
        })
    }

    fn iterator(&self, graph: &Graph, sources: &[NodeId]) -> Box<dyn LevelOrder> {
        match self.config.traversal {
            TraversalMode::OneShot => Box::new(OneShotLevelOrder::new(graph, sources)),
            TraversalMode::Infinite => Box::new(InfiniteLevelOrder::new(graph, sources)),
            TraversalMode::RepeatedOneShot => Box::new(RepeatedLevelOrder::new(graph, sources)),
        }
    }
}

impl From<RunnerConfig> for Runner {
    fn from(config: RunnerConfig) -> Self {
        Self::new(config)
    }
}

/// Run `graph` once with the default configuration.
pub fn run(graph: &mut Graph) -> Result<RunReport> {
    Runner::default().run(graph)
}
