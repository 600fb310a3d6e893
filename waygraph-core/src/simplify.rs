//! Collapse of interior degree-2 nodes.
//!
//! A node `B` is removed when it has exactly two neighbours `A` and `C`,
//! belongs to exactly one way, and that way references more than two nodes.
//! The path `A - B - C` becomes a direct `A - C` connection whose weight is
//! recomputed by the network's policy from `A`, `C` and the way, not summed
//! from the removed segments.
//!
//! Nodes are visited in a snapshot of the node identifiers taken before the
//! pass; eligibility is checked against the live graph, so long chains
//! collapse within a single pass. A node whose neighbourhood turns out to be
//! inconsistent is logged and left in place.

use log::{debug, info, warn};
use thiserror::Error;

use crate::network::{NetworkError, NetworkGraph, NodeId, SegmentWeights, WayId};

/// Outcome of a simplification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimplifyReport {
    /// Nodes collapsed into direct connections.
    pub removed: usize,
    /// Eligible nodes left in place because their neighbourhood could not be
    /// rewritten.
    pub skipped: usize,
}

/// Inconsistent graph state found while rewriting one node's neighbourhood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimplifyError {
    /// The node belongs to a way missing from the way table.
    #[error("node {node} belongs to way {way}, which is not in the network")]
    MissingWay {
        /// Node under consideration.
        node: NodeId,
        /// Unknown way.
        way: WayId,
    },
    /// A neighbour is missing from the node table.
    #[error("node {node} lists unknown neighbour {neighbour}")]
    MissingNeighbour {
        /// Node under consideration.
        node: NodeId,
        /// Unknown neighbour.
        neighbour: NodeId,
    },
    /// A neighbour does not list the node back.
    #[error("neighbour {neighbour} of node {node} does not list it as adjacent")]
    NonReciprocal {
        /// Node under consideration.
        node: NodeId,
        /// Neighbour with the one-sided entry.
        neighbour: NodeId,
    },
    /// The replacement segment could not be weighted.
    #[error("failed to weight replacement segment around node {node}")]
    Weight {
        /// Node under consideration.
        node: NodeId,
        /// Network failure.
        #[source]
        source: NetworkError,
    },
}

/// A planned replacement of `first - node - last` by `first - last`.
#[derive(Debug, Clone, Copy)]
struct Collapse {
    node: NodeId,
    first: NodeId,
    last: NodeId,
    weights: SegmentWeights,
}

/// Runs one simplification pass over `network`.
///
/// Prefer [`NetworkGraph::simplify`]; this free function exists so the pass
/// can be driven independently of the graph type's API.
pub fn simplify(network: &mut NetworkGraph) -> SimplifyReport {
    let mut report = SimplifyReport::default();
    for node_id in network.node_ids() {
        match plan_collapse(network, node_id) {
            None => {}
            Some(Ok(collapse)) => {
                apply_collapse(network, collapse);
                report.removed += 1;
            }
            Some(Err(err)) => {
                warn!("Skipped simplifying node {node_id}: {err}");
                report.skipped += 1;
            }
        }
    }
    info!(
        "Simplify: removed {} nodes, skipped {}",
        report.removed, report.skipped
    );
    report
}

/// Checks eligibility of `node_id` against the live graph and prepares the
/// rewrite without mutating anything. Returns `None` for ineligible nodes.
fn plan_collapse(
    network: &NetworkGraph,
    node_id: NodeId,
) -> Option<Result<Collapse, SimplifyError>> {
    let node = network.node(node_id)?;
    let mut neighbours = node.neighbours().iter().copied();
    let (Some(first), Some(last), None) = (neighbours.next(), neighbours.next(), neighbours.next())
    else {
        return None;
    };
    let mut ways = node.ways().iter().copied();
    let (Some(way_id), None) = (ways.next(), ways.next()) else {
        return None;
    };
    let Some(way) = network.way(way_id) else {
        return Some(Err(SimplifyError::MissingWay {
            node: node_id,
            way: way_id,
        }));
    };
    if way.node_ids().len() <= 2 {
        return None;
    }
    Some(
        check_reciprocal(network, node_id, first)
            .and_then(|()| check_reciprocal(network, node_id, last))
            .and_then(|()| {
                network
                    .segment_weights(way, first, last)
                    .map_err(|source| SimplifyError::Weight {
                        node: node_id,
                        source,
                    })
            })
            .map(|weights| Collapse {
                node: node_id,
                first,
                last,
                weights,
            }),
    )
}

fn check_reciprocal(
    network: &NetworkGraph,
    node: NodeId,
    neighbour: NodeId,
) -> Result<(), SimplifyError> {
    let other = network
        .node(neighbour)
        .ok_or(SimplifyError::MissingNeighbour { node, neighbour })?;
    if other.neighbours().contains(&node) {
        Ok(())
    } else {
        Err(SimplifyError::NonReciprocal { node, neighbour })
    }
}

fn apply_collapse(network: &mut NetworkGraph, collapse: Collapse) {
    debug!(
        "Collapsing node {} into segment {} - {}",
        collapse.node, collapse.first, collapse.last
    );
    network.drop_segment(collapse.first, collapse.node);
    network.drop_segment(collapse.node, collapse.last);
    network.link(collapse.first, collapse.last, collapse.weights);
    network.drop_node(collapse.node);
}
