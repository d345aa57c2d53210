//! Setting-up and dismantling visitors.
//!
//! Both remember every unit they have handled for their whole lifetime, so a
//! unit reached through several nodes (or through nested composites) sees
//! exactly one call. Use one visitor instance per graph-wide pass.

use super::{inner_order, Visitor};
use crate::error::Result;
use crate::pipeline::graph::Graph;
use crate::pipeline::id::{NodeId, UnitId};
use std::collections::HashSet;

/// Calls `set_up()` once per distinct unit.
#[derive(Debug, Default)]
pub struct SettingUpVisitor {
    handled: HashSet<UnitId>,
}

impl SettingUpVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_handled(&self, unit: UnitId) -> bool {
        self.handled.contains(&unit)
    }

    /// Number of distinct units set up so far.
    pub fn handled_count(&self) -> usize {
        self.handled.len()
    }
}

impl Visitor for SettingUpVisitor {
    fn visit_plain_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool> {
        let unit = graph.plain(id)?.unit();
        if self.handled.insert(unit) {
            tracing::debug!("Setting up unit {:?} via {:?}", unit, id);
            graph.set_up_unit(id, unit)?;
        }
        Ok(true)
    }

    fn visit_composite_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool> {
        descend(self, graph, id)
    }
}

/// Calls `dismantle()` once per distinct unit.
#[derive(Debug, Default)]
pub struct DismantlingVisitor {
    handled: HashSet<UnitId>,
}

impl DismantlingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_handled(&self, unit: UnitId) -> bool {
        self.handled.contains(&unit)
    }

    /// Number of distinct units dismantled so far.
    pub fn handled_count(&self) -> usize {
        self.handled.len()
    }
}

impl Visitor for DismantlingVisitor {
    fn visit_plain_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool> {
        let unit = graph.plain(id)?.unit();
        if self.handled.insert(unit) {
            tracing::debug!("Dismantling unit {:?} via {:?}", unit, id);
            graph.dismantle_unit(id, unit)?;
        }
        Ok(true)
    }

    fn visit_composite_node(&mut self, graph: &mut Graph, id: NodeId) -> Result<bool> {
        descend(self, graph, id)
    }
}

/// Apply `visitor` to the whole inner graph of composite `id`.
fn descend<V: Visitor>(visitor: &mut V, graph: &mut Graph, id: NodeId) -> Result<bool> {
    let inner = inner_order(graph, id)?;
    tracing::debug!("Descending into composite {:?} ({} inner nodes)", id, inner.len());
    for node in inner {
        graph.visit(node, visitor)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FlowError, Stage};
    use crate::pipeline::unit::MockUnit;
    use crate::pipeline::units::Passthrough;

    fn set_up_once() -> MockUnit {
        let mut unit = MockUnit::new();
        unit.expect_set_up().times(1).returning(|| Ok(()));
        unit
    }

    fn dismantle_once() -> MockUnit {
        let mut unit = MockUnit::new();
        unit.expect_dismantle().times(1).returning(|| Ok(()));
        unit
    }

    #[test]
    fn test_shared_unit_is_set_up_once() {
        let mut g = Graph::new();
        let unit = g.add_unit("shared", set_up_once());
        let a = g.add_plain("a", unit).unwrap();
        let b = g.add_plain("b", unit).unwrap();
        g.connect(a, b).unwrap();

        let mut visitor = SettingUpVisitor::new();
        assert!(g.visit(a, &mut visitor).unwrap());
        assert!(g.visit(b, &mut visitor).unwrap());
        assert!(g.visit(a, &mut visitor).unwrap());
        assert!(visitor.is_handled(unit));
        assert_eq!(visitor.handled_count(), 1);
    }

    #[test]
    fn test_dismantle_dedups_across_nested_composites() {
        // outer(inner(x) -> y), where x wraps the same unit as the top-level z
        let mut g = Graph::new();
        let shared = g.add_unit("shared", dismantle_once());
        let x = g.add_plain("x", shared).unwrap();
        let inner = g.add_composite("inner", [x], x).unwrap();
        let y = g.add_unit_node("y", dismantle_once());
        g.connect(inner, y).unwrap();
        let outer = g.add_composite("outer", [inner], y).unwrap();
        let z = g.add_plain("z", shared).unwrap();

        let mut visitor = DismantlingVisitor::new();
        assert!(g.visit(outer, &mut visitor).unwrap());
        assert!(g.visit(z, &mut visitor).unwrap());
        assert_eq!(visitor.handled_count(), 2);
    }

    #[test]
    fn test_set_up_failure_carries_stage_and_unit() {
        let mut g = Graph::new();
        let mut unit = MockUnit::new();
        unit.expect_set_up()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("device busy")));
        let a = g.add_unit_node("dev", unit);

        let err = g.visit(a, &mut SettingUpVisitor::new()).unwrap_err();
        match err {
            FlowError::Unit {
                node, unit, stage, ..
            } => {
                assert_eq!(node, a);
                assert_eq!(unit, "dev");
                assert_eq!(stage, Stage::SetUp);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_separate_visitors_do_not_share_state() {
        let mut g = Graph::new();
        let a = g.add_unit_node("a", Passthrough);
        let unit = g.plain(a).unwrap().unit();

        let mut first = SettingUpVisitor::new();
        g.visit(a, &mut first).unwrap();
        let second = SettingUpVisitor::new();
        assert!(first.is_handled(unit));
        assert!(!second.is_handled(unit));
    }
}
