//! Ordered paths through the node table.

use std::fmt;

use super::node::{NodeId, Tags, write_joined, write_tags};

/// Tag holding a way's road classification.
pub const HIGHWAY: &str = "highway";

/// Identifier of a way as assigned by the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WayId(pub i64);

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for WayId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A linear feature such as a road: tags plus an ordered list of node
/// references.
///
/// The order of `nodes` defines the path. Closed loops repeat the first
/// reference at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    id: WayId,
    tags: Tags,
    nodes: Vec<NodeId>,
}

impl Way {
    /// Creates a way from its tags and node references.
    #[must_use]
    pub const fn new(id: WayId, tags: Tags, nodes: Vec<NodeId>) -> Self {
        Self { id, tags, nodes }
    }

    /// Creates a way tagged only with `highway=<class>`.
    #[must_use]
    pub fn road(id: WayId, class: &str, nodes: Vec<NodeId>) -> Self {
        let mut tags = Tags::new();
        tags.insert(HIGHWAY.to_owned(), class.to_owned());
        Self::new(id, tags, nodes)
    }

    /// Identifier of this way.
    #[must_use]
    pub const fn id(&self) -> WayId {
        self.id
    }

    /// All tags.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Looks up a single tag.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Value of the `highway` tag, if present.
    #[must_use]
    pub fn highway(&self) -> Option<&str> {
        self.tag(HIGHWAY)
    }

    /// Node references in path order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Consecutive `(from, to)` pairs along the path.
    ///
    /// Repeated consecutive references (zero-length hops) are skipped.
    pub fn segments(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .iter()
            .zip(self.nodes.iter().skip(1))
            .filter(|(from, to)| from != to)
            .map(|(from, to)| (*from, *to))
    }
}

impl fmt::Display for Way {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WAY {} : nodes (", self.id)?;
        write_joined(f, &self.nodes)?;
        f.write_str(") tags (")?;
        write_tags(f, &self.tags)?;
        f.write_str(")")
    }
}
