//! Behavioural tests for degree-2 node simplification.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs, path::PathBuf};
use waygraph_core::test_support::{equatorial_chain, network_with, road};
use waygraph_core::{NetworkGraph, NodeId, SimplifyReport};

#[fixture]
fn network() -> RefCell<Option<NetworkGraph>> {
    RefCell::new(None)
}

#[fixture]
fn report() -> RefCell<Option<SimplifyReport>> {
    RefCell::new(None)
}

fn expect_report(report: &RefCell<Option<SimplifyReport>>) -> SimplifyReport {
    report.borrow().clone().expect("simplification was run")
}

fn chain_of(length: usize) -> NetworkGraph {
    let (nodes, way) = equatorial_chain(10, length, 0.001);
    network_with(&nodes, [way]).expect("chain builds")
}

#[given("a residential road through three nodes")]
fn straight_road(#[from(network)] network: &RefCell<Option<NetworkGraph>>) {
    *network.borrow_mut() = Some(chain_of(3));
}

#[given("a residential road through six nodes")]
fn long_road(#[from(network)] network: &RefCell<Option<NetworkGraph>>) {
    *network.borrow_mut() = Some(chain_of(6));
}

#[given("two roads meeting at a shared node")]
fn junction(#[from(network)] network: &RefCell<Option<NetworkGraph>>) {
    let built = network_with(
        &[
            (1, 0.0, 0.0),
            (2, 0.0, 0.001),
            (3, 0.0, 0.002),
            (4, 0.001, 0.001),
        ],
        [
            road(10, "residential", &[1, 2, 3]),
            road(11, "service", &[2, 4]),
        ],
    )
    .expect("junction builds");
    *network.borrow_mut() = Some(built);
}

#[when("I simplify the network")]
fn simplify_network(
    #[from(network)] network: &RefCell<Option<NetworkGraph>>,
    #[from(report)] report: &RefCell<Option<SimplifyReport>>,
) {
    let outcome = network
        .borrow_mut()
        .as_mut()
        .expect("network prepared")
        .simplify();
    *report.borrow_mut() = Some(outcome);
}

#[then("one node is removed")]
fn one_removed(#[from(report)] report: &RefCell<Option<SimplifyReport>>) {
    assert_eq!(expect_report(report).removed, 1);
}

#[then("four nodes are removed")]
fn four_removed(#[from(report)] report: &RefCell<Option<SimplifyReport>>) {
    assert_eq!(expect_report(report).removed, 4);
}

#[then("no node is removed")]
fn none_removed(#[from(report)] report: &RefCell<Option<SimplifyReport>>) {
    let outcome = expect_report(report);
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.skipped, 0);
}

#[then("the end nodes are joined directly")]
fn ends_joined(#[from(network)] network: &RefCell<Option<NetworkGraph>>) {
    let borrowed = network.borrow();
    let graph = borrowed.as_ref().expect("network prepared");
    let ends: Vec<NodeId> = graph.connected_nodes().map(|node| node.id()).collect();
    let [first, last] = ends.as_slice() else {
        panic!("expected exactly two connected nodes, got {ends:?}");
    };
    assert!(graph.segment_weight(*first, *last).is_some());
    assert!(graph.segment_weight(*last, *first).is_some());
    assert_eq!(graph.segment_count(), 2);
}

#[then("the shared node keeps its connections")]
fn junction_kept(#[from(network)] network: &RefCell<Option<NetworkGraph>>) {
    let borrowed = network.borrow();
    let graph = borrowed.as_ref().expect("network prepared");
    let shared = graph.node(NodeId(2)).expect("junction survives");
    let neighbours: Vec<NodeId> = shared.neighbours().iter().copied().collect();
    assert_eq!(neighbours, [NodeId(1), NodeId(3), NodeId(4)]);
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/simplify.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<String> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .map(|title| title.to_owned())
        .collect();
    let expected = [
        "collapsing a straight road",
        "keeping a junction",
        "collapsing a long chain",
    ];
    assert_eq!(
        titles, expected,
        "scenario order changed in feature file: {titles:?}"
    );
}

#[scenario(path = "tests/features/simplify.feature", index = 0)]
fn collapsing_straight_road(
    network: RefCell<Option<NetworkGraph>>,
    report: RefCell<Option<SimplifyReport>>,
) {
    let _ = (network, report);
}

#[scenario(path = "tests/features/simplify.feature", index = 1)]
fn keeping_junction(network: RefCell<Option<NetworkGraph>>, report: RefCell<Option<SimplifyReport>>) {
    let _ = (network, report);
}

#[scenario(path = "tests/features/simplify.feature", index = 2)]
fn collapsing_long_chain(
    network: RefCell<Option<NetworkGraph>>,
    report: RefCell<Option<SimplifyReport>>,
) {
    let _ = (network, report);
}
