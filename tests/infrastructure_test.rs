//! Test to verify test infrastructure works correctly

mod common;

use common::builders::{diamond, routed};
use dataflow_rs::{batch, Value};

#[test]
fn test_infrastructure_setup() {
    common::init_tracing();
    let d = diamond();
    assert_eq!(d.graph.node_count(), 4);
    assert_eq!(d.graph.link_count(), 4);
    assert_eq!(d.graph.sources(), vec![d.a]);
}

#[test]
fn test_routed_builder_wraps_composite() {
    let r = routed(vec![batch![1]]);
    let graph = &r.graph;
    assert_eq!(graph.node(r.p21).unwrap().owner(), Some(r.composite));
    assert_eq!(graph.node(r.p22).unwrap().owner(), Some(r.composite));
    assert_eq!(graph.sources(), vec![r.p1]);
    assert_eq!(graph.top_level_nodes(), vec![r.p1, r.composite, r.p2]);
}

#[test]
fn test_ints_helper() {
    let values = vec![Value::Int(3), Value::from("x"), Value::Int(-1)];
    assert_eq!(common::ints(&values), vec![3, -1]);
}
