//! Test graph builders

use dataflow_rs::batch;
use dataflow_rs::pipeline::{FnUnit, Graph, NodeId, Passthrough, Recorder, RecorderHandle, Sequence};
use dataflow_rs::Value;

/// `A → B, A → C, B → D, C → D`
pub struct Diamond {
    pub graph: Graph,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub d: NodeId,
}

pub fn diamond() -> Diamond {
    let mut graph = Graph::new();
    let a = graph.add_unit_node("A", Passthrough);
    let b = graph.add_unit_node("B", Passthrough);
    let c = graph.add_unit_node("C", Passthrough);
    let d = graph.add_unit_node("D", Passthrough);
    graph.connect(a, b).unwrap();
    graph.connect(a, c).unwrap();
    graph.connect(b, d).unwrap();
    graph.connect(c, d).unwrap();
    Diamond { graph, a, b, c, d }
}

/// `A ⇄ B`
pub fn two_cycle() -> (Graph, NodeId, NodeId) {
    let mut graph = Graph::new();
    let a = graph.add_unit_node("A", Passthrough);
    let b = graph.add_unit_node("B", Passthrough);
    graph.connect(a, b).unwrap();
    graph.connect(b, a).unwrap();
    (graph, a, b)
}

/// `P1 → C(P21 → P22) → P2` where P21 doubles integers and P22 adds one.
pub struct Routed {
    pub graph: Graph,
    pub p1: NodeId,
    pub p21: NodeId,
    pub p22: NodeId,
    pub composite: NodeId,
    pub p2: NodeId,
    pub seen: RecorderHandle,
}

pub fn routed(input: Vec<dataflow_rs::Batch>) -> Routed {
    let mut graph = Graph::new();
    let p1 = graph.add_unit_node("P1", Sequence::new(input));
    let p21 = graph.add_unit_node("P21", map_ints(|v| v * 2));
    let p22 = graph.add_unit_node("P22", map_ints(|v| v + 1));
    graph.connect(p21, p22).unwrap();
    let composite = graph.add_composite("C", [p21], p22).unwrap();
    let (recorder, seen) = Recorder::new();
    let p2 = graph.add_unit_node("P2", recorder);
    graph.connect(p1, composite).unwrap();
    graph.connect(composite, p2).unwrap();
    Routed {
        graph,
        p1,
        p21,
        p22,
        composite,
        p2,
        seen,
    }
}

/// Unit applying `f` to every integer input, dropping other values.
pub fn map_ints(
    f: fn(i64) -> i64,
) -> FnUnit<impl FnMut(&[Value], &mut Vec<Value>) -> anyhow::Result<()> + Send> {
    FnUnit::new(move |inputs: &[Value], outputs: &mut Vec<Value>| {
        outputs.extend(inputs.iter().filter_map(Value::as_int).map(|v| Value::Int(f(v))));
        Ok(())
    })
}

/// Source emitting `1..=n`, one value per batch.
pub fn counter(n: i64) -> Sequence {
    Sequence::new((1..=n).map(|i| batch![i]).collect())
}
