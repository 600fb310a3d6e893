//! Builders for small networks used by unit, behaviour and benchmark code.

use crate::{NetworkError, NetworkGraph, Node, NodeId, Way, WayId};

/// Node with the given raw identifier and coordinates.
#[must_use]
pub fn node_at(id: i64, lat: f64, lon: f64) -> Node {
    Node::at(NodeId(id), lat, lon)
}

/// Way tagged `highway=<class>` through the given raw node identifiers.
#[must_use]
pub fn road(id: i64, class: &str, nodes: &[i64]) -> Way {
    Way::road(
        WayId(id),
        class,
        nodes.iter().copied().map(NodeId).collect(),
    )
}

/// Default-policy network holding `nodes` as `(id, lat, lon)` and `ways`.
///
/// # Errors
///
/// Propagates the first [`NetworkError`] raised while adding a way.
pub fn network_with<I>(nodes: &[(i64, f64, f64)], ways: I) -> Result<NetworkGraph, NetworkError>
where
    I: IntoIterator<Item = Way>,
{
    let mut network = NetworkGraph::new();
    for &(id, lat, lon) in nodes {
        network.add_node(node_at(id, lat, lon));
    }
    for way in ways {
        network.add_way(way)?;
    }
    Ok(network)
}

/// Straight east-west road of `length` nodes spaced `step` degrees apart
/// along the equator, as `(nodes, way)` ready for [`network_with`].
#[must_use]
pub fn equatorial_chain(way_id: i64, length: usize, step: f64) -> (Vec<(i64, f64, f64)>, Way) {
    let mut nodes = Vec::with_capacity(length);
    let mut lon = 0.0;
    let mut id: i64 = 1;
    for _ in 0..length {
        nodes.push((id, 0.0, lon));
        lon = next_longitude(lon, step);
        id = id.saturating_add(1);
    }
    let refs: Vec<i64> = nodes.iter().map(|&(node_id, _, _)| node_id).collect();
    (nodes, road(way_id, "residential", &refs))
}

#[expect(
    clippy::float_arithmetic,
    reason = "longitudes advance by a fixed step"
)]
fn next_longitude(lon: f64, step: f64) -> f64 {
    lon + step
}
