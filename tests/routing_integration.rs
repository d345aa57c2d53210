//! End-to-end routing through plain and composite nodes

mod common;

use common::builders::{map_ints, routed};
use common::mock_helpers::lifecycle_once;
use dataflow_rs::pipeline::{
    DismantlingVisitor, Graph, OneShotLevelOrder, ProcessingVisitor, Recorder, SettingUpVisitor,
    Sequence,
};
use dataflow_rs::{batch, Batch, Value};

#[test]
fn test_routing_through_composite() {
    common::init_tracing();
    let mut r = routed(vec![batch![1, 2], batch![10]]);
    let sources = r.graph.sources();

    let mut processing = ProcessingVisitor::new();
    for _ in 0..2 {
        for id in OneShotLevelOrder::new(&r.graph, &sources) {
            r.graph.visit(id, &mut processing).unwrap();
        }
    }

    assert_eq!(r.seen.batches(), vec![batch![3, 5], batch![21]]);
    assert!(!r.graph.has_pending_values());
    // P1, P21, P22, P2 per pass
    assert_eq!(processing.executions(), 8);
}

#[test]
fn test_set_up_process_dismantle_each_unit_once() {
    common::init_tracing();
    let mut g = Graph::new();
    let p1 = g.add_unit_node("P1", Sequence::new(vec![batch![7]]));
    let p21 = g.add_unit_node("P21", lifecycle_once());
    let p22 = g.add_unit_node("P22", lifecycle_once());
    g.connect(p21, p22).unwrap();
    let c = g.add_composite("C", [p21], p22).unwrap();
    let (recorder, seen) = Recorder::new();
    let p2 = g.add_unit_node("P2", recorder);
    g.connect(p1, c).unwrap();
    g.connect(c, p2).unwrap();

    let sources = g.sources();
    let order: Vec<_> = OneShotLevelOrder::new(&g, &sources).collect();
    assert_eq!(order, vec![p1, c, p2]);

    let mut setting_up = SettingUpVisitor::new();
    for &id in &order {
        assert!(g.visit(id, &mut setting_up).unwrap());
    }
    assert_eq!(setting_up.handled_count(), 4);

    let mut processing = ProcessingVisitor::new();
    for &id in &order {
        g.visit(id, &mut processing).unwrap();
    }
    assert_eq!(seen.batches(), vec![batch![7]]);

    let mut dismantling = DismantlingVisitor::new();
    for &id in &order {
        assert!(g.visit(id, &mut dismantling).unwrap());
    }
    assert_eq!(dismantling.handled_count(), 4);
}

#[test]
fn test_multi_input_merge_with_silent_predecessor() {
    let mut g = Graph::new();
    let a = g.add_unit_node("A", Sequence::new(vec![batch![23]]));
    let b = g.add_unit_node("B", Sequence::new(vec![batch!["hello"]]));
    let silent = g.add_unit_node("silent", Sequence::new(Vec::new()));
    let (recorder, seen) = Recorder::new();
    let merge = g.add_unit_node("merge", recorder);
    for pred in [a, b, silent] {
        g.connect(pred, merge).unwrap();
    }

    let mut processing = ProcessingVisitor::new();
    let sources = g.sources();
    assert_eq!(sources, vec![a, b, silent]);
    for id in OneShotLevelOrder::new(&g, &sources) {
        g.visit(id, &mut processing).unwrap();
    }

    assert_eq!(seen.batches(), vec![batch![23, "hello"]]);
    assert_eq!(
        serde_json::to_string(&seen.batches()[0]).unwrap(),
        r#"[23,"hello"]"#
    );
}

#[test]
fn test_nested_composites_forward_sink_output() {
    // outer( inner( x ) → y ), fed by src, read by rec
    let mut g = Graph::new();
    let src = g.add_unit_node("src", Sequence::new(vec![batch![4]]));
    let x = g.add_unit_node("x", map_ints(|v| v * 10));
    let inner = g.add_composite("inner", [x], x).unwrap();
    let y = g.add_unit_node("y", map_ints(|v| v + 2));
    g.connect(inner, y).unwrap();
    let outer = g.add_composite("outer", [inner], y).unwrap();
    let (recorder, seen) = Recorder::new();
    let rec = g.add_unit_node("rec", recorder);
    g.connect(src, outer).unwrap();
    g.connect(outer, rec).unwrap();

    let mut processing = ProcessingVisitor::new();
    for id in [src, outer, rec] {
        g.visit(id, &mut processing).unwrap();
    }
    assert_eq!(seen.values(), vec![Value::Int(42)]);
}

#[test]
fn test_feedback_loop_accumulates() {
    // src → acc, acc → acc: acc sums fresh input with its own last output.
    let mut g = Graph::new();
    let src = g.add_unit_node("src", common::builders::counter(3));
    let acc = g.add_unit_node(
        "acc",
        dataflow_rs::pipeline::FnUnit::new(|inputs: &[Value], outputs: &mut Vec<Value>| {
            let sum: i64 = inputs.iter().filter_map(Value::as_int).sum();
            outputs.push(Value::Int(sum));
            Ok(())
        }),
    );
    let (recorder, seen) = Recorder::new();
    let rec = g.add_unit_node("rec", recorder);
    g.connect(src, acc).unwrap();
    g.connect(acc, acc).unwrap();
    g.connect(acc, rec).unwrap();

    let mut processing = ProcessingVisitor::new();
    let order: Vec<_> = OneShotLevelOrder::new(&g, &g.sources()).collect();
    for _ in 0..3 {
        for &id in &order {
            g.visit(id, &mut processing).unwrap();
        }
    }

    let totals: Vec<Batch> = seen.batches();
    assert_eq!(totals, vec![batch![1], batch![3], batch![6]]);
}
