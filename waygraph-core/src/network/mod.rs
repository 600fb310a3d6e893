//! The mutable road network: nodes, ways and weighted segments.
//!
//! Responsibilities:
//! - Own the node, way and segment tables.
//! - Keep adjacency and way-membership indexes in step with the segments.
//! - Compute segment weights through the configured [`EdgeWeightPolicy`].
//!
//! Invariants:
//! - Adjacency is symmetric outside a single call.
//! - A segment `(a, b)` exists only while `a` and `b` are adjacent.
//! - Every committed segment exists in both directions.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::simplify::{SimplifyReport, simplify};
use crate::weight::{EdgeWeightPolicy, RoadImportanceDistance, WeightError};

mod node;
mod way;

pub use node::{CoordinateError, LAT, LON, Node, NodeId, Tags};
pub use way::{HIGHWAY, Way, WayId};

/// Errors raised while building a [`NetworkGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// A way references a node that is not in the node table.
    #[error("way {way} references unknown node {node}")]
    MissingNode {
        /// Way being committed.
        way: WayId,
        /// First reference that could not be resolved.
        node: NodeId,
    },
    /// The weight policy rejected a segment.
    #[error("failed to weight segment {from} -> {to} on way {way}")]
    Weight {
        /// Way the segment belongs to.
        way: WayId,
        /// Segment start.
        from: NodeId,
        /// Segment end.
        to: NodeId,
        /// Policy failure.
        #[source]
        source: WeightError,
    },
}

/// How segment weights are stored for the two directions of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directionality {
    /// The policy runs once per connection and the weight is mirrored.
    #[default]
    Undirected,
    /// The policy runs separately for each direction.
    Directed,
}

/// A directed, weighted edge between two adjacent nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start node.
    pub from: NodeId,
    /// End node.
    pub to: NodeId,
    /// Weight assigned by the policy.
    pub weight: f64,
}

/// Weights for both directions of one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SegmentWeights {
    pub(crate) forward: f64,
    pub(crate) backward: f64,
}

/// Road network assembled from nodes and ways.
///
/// The lifecycle is: create empty, add nodes and ways while ingesting,
/// call [`simplify`](Self::simplify) once, then read.
///
/// # Examples
///
/// ```
/// use waygraph_core::{NetworkGraph, Node, NodeId, Way, WayId};
///
/// # fn main() -> Result<(), waygraph_core::NetworkError> {
/// let mut network = NetworkGraph::new();
/// network.add_node(Node::at(NodeId(1), 0.0, 0.0));
/// network.add_node(Node::at(NodeId(2), 0.0, 0.001));
/// network.add_node(Node::at(NodeId(3), 0.0, 0.002));
/// network.add_way(Way::road(
///     WayId(10),
///     "residential",
///     vec![NodeId(1), NodeId(2), NodeId(3)],
/// ))?;
/// assert_eq!(network.segment_count(), 4);
///
/// let report = network.simplify();
/// assert_eq!(report.removed, 1);
/// assert!(network.segment_weight(NodeId(1), NodeId(3)).is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NetworkGraph {
    nodes: BTreeMap<NodeId, Node>,
    ways: BTreeMap<WayId, Way>,
    segments: BTreeMap<(NodeId, NodeId), f64>,
    policy: Box<dyn EdgeWeightPolicy>,
    directionality: Directionality,
}

impl Default for NetworkGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkGraph {
    /// Creates an empty undirected network weighted by
    /// [`RoadImportanceDistance`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RoadImportanceDistance)
    }

    /// Creates an empty undirected network weighted by `policy`.
    #[must_use]
    pub fn with_policy<P>(policy: P) -> Self
    where
        P: EdgeWeightPolicy + 'static,
    {
        Self {
            nodes: BTreeMap::new(),
            ways: BTreeMap::new(),
            segments: BTreeMap::new(),
            policy: Box::new(policy),
            directionality: Directionality::default(),
        }
    }

    /// Sets how weights are computed for the reverse direction.
    #[must_use]
    pub fn with_directionality(mut self, directionality: Directionality) -> Self {
        self.directionality = directionality;
        self
    }

    /// The configured weight policy.
    #[must_use]
    pub fn policy(&self) -> &dyn EdgeWeightPolicy {
        self.policy.as_ref()
    }

    /// The configured directionality.
    #[must_use]
    pub const fn directionality(&self) -> Directionality {
        self.directionality
    }

    /// Inserts a node, replacing any node with the same identifier.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id(), node);
    }

    /// Commits a way: records membership for every referenced node and
    /// connects each consecutive pair with weighted segments.
    ///
    /// All weights are computed before the graph is touched, so a failing
    /// way leaves the network unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] when a reference is not in the
    /// node table and [`NetworkError::Weight`] when the policy rejects a
    /// segment.
    pub fn add_way(&mut self, way: Way) -> Result<(), NetworkError> {
        if let Some(missing) = way
            .node_ids()
            .iter()
            .find(|node_id| !self.nodes.contains_key(node_id))
        {
            return Err(NetworkError::MissingNode {
                way: way.id(),
                node: *missing,
            });
        }
        let links = way
            .segments()
            .map(|(from, to)| {
                self.segment_weights(&way, from, to)
                    .map(|weights| (from, to, weights))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let way_id = way.id();
        for node_id in way.node_ids() {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.add_to_way(way_id);
            }
        }
        for (from, to, weights) in links {
            self.link(from, to, weights);
        }
        self.ways.insert(way_id, way);
        Ok(())
    }

    /// Connects `from` and `to` as part of `way`, replacing any existing
    /// weights for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingNode`] when either endpoint is unknown
    /// and [`NetworkError::Weight`] when the policy rejects the segment.
    pub fn add_segment(&mut self, way: &Way, from: NodeId, to: NodeId) -> Result<(), NetworkError> {
        for endpoint in [from, to] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(NetworkError::MissingNode {
                    way: way.id(),
                    node: endpoint,
                });
            }
        }
        let weights = self.segment_weights(way, from, to)?;
        self.link(from, to, weights);
        Ok(())
    }

    /// Removes a way, its membership entries and the segments between its
    /// consecutive nodes. Unknown ways are ignored.
    pub fn drop_way(&mut self, way_id: WayId) {
        let Some(way) = self.ways.remove(&way_id) else {
            return;
        };
        for node_id in way.node_ids() {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.drop_from_way(way_id);
            }
        }
        for (from, to) in way.segments() {
            self.drop_segment(from, to);
        }
    }

    /// Removes the connection between `from` and `to`: adjacency on both
    /// sides and the segments in both directions. Absent entries are
    /// ignored.
    pub fn drop_segment(&mut self, from: NodeId, to: NodeId) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.drop_neighbour(to);
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.drop_neighbour(from);
        }
        self.segments.remove(&(from, to));
        self.segments.remove(&(to, from));
    }

    /// Removes a node together with its remaining connections. Unknown
    /// nodes are ignored.
    pub fn drop_node(&mut self, node_id: NodeId) {
        let Some(node) = self.nodes.remove(&node_id) else {
            return;
        };
        for neighbour in node.neighbours() {
            if let Some(other) = self.nodes.get_mut(neighbour) {
                other.drop_neighbour(node_id);
            }
            self.segments.remove(&(node_id, *neighbour));
            self.segments.remove(&(*neighbour, node_id));
        }
    }

    /// Collapses interior degree-2 nodes; see [`crate::simplify`].
    ///
    /// Must run once, after every way has been added.
    pub fn simplify(&mut self) -> SimplifyReport {
        simplify(self)
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// All nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Nodes that take part in at least one connection.
    pub fn connected_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes
            .values()
            .filter(|node| !node.neighbours().is_empty())
    }

    /// Looks up a way.
    #[must_use]
    pub fn way(&self, way_id: WayId) -> Option<&Way> {
        self.ways.get(&way_id)
    }

    /// All committed ways in identifier order.
    pub fn ways(&self) -> impl Iterator<Item = &Way> + '_ {
        self.ways.values()
    }

    /// Weight of the directed segment `from -> to`, if present.
    #[must_use]
    pub fn segment_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.segments.get(&(from, to)).copied()
    }

    /// All directed segments ordered by `(from, to)`.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.segments.iter().map(|(&(from, to), &weight)| Segment {
            from,
            to,
            weight,
        })
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of committed ways.
    #[must_use]
    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// Number of directed segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Identifiers of all nodes, in order, detached from the graph.
    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Weights `from -> to` (and `to -> from`) according to the policy and
    /// directionality. Both endpoints must exist.
    pub(crate) fn segment_weights(
        &self,
        way: &Way,
        from: NodeId,
        to: NodeId,
    ) -> Result<SegmentWeights, NetworkError> {
        let (Some(from_node), Some(to_node)) = (self.nodes.get(&from), self.nodes.get(&to)) else {
            let node = if self.nodes.contains_key(&from) { to } else { from };
            return Err(NetworkError::MissingNode {
                way: way.id(),
                node,
            });
        };
        let weigh = |start: &Node, end: &Node| {
            self.policy
                .weight(start, end, way)
                .map_err(|source| NetworkError::Weight {
                    way: way.id(),
                    from: start.id(),
                    to: end.id(),
                    source,
                })
        };
        let forward = weigh(from_node, to_node)?;
        let backward = match self.directionality {
            Directionality::Undirected => forward,
            Directionality::Directed => weigh(to_node, from_node)?,
        };
        Ok(SegmentWeights { forward, backward })
    }

    /// Records adjacency and stores both directed weights.
    pub(crate) fn link(&mut self, from: NodeId, to: NodeId, weights: SegmentWeights) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.add_neighbour(to);
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.add_neighbour(from);
        }
        self.segments.insert((from, to), weights.forward);
        self.segments.insert((to, from), weights.backward);
    }
}

impl fmt::Display for NetworkGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes.values() {
            writeln!(f, "{node}")?;
        }
        for way in self.ways.values() {
            writeln!(f, "{way}")?;
        }
        for segment in self.segments() {
            writeln!(
                f,
                "({}, {})={:.4}",
                segment.from, segment.to, segment.weight
            )?;
        }
        Ok(())
    }
}
