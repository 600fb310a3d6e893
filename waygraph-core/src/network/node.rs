//! Graph vertices and their identifiers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::ParseFloatError;

use geo::Coord;
use thiserror::Error;

use super::way::WayId;

/// Key/value attributes attached to nodes and ways.
pub type Tags = BTreeMap<String, String>;

/// Attribute holding a node's latitude in decimal degrees.
pub const LAT: &str = "lat";

/// Attribute holding a node's longitude in decimal degrees.
pub const LON: &str = "lon";

/// Identifier of a node as assigned by the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Errors raised when a node's coordinates cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// The node has no such attribute.
    #[error("node {node} has no `{attribute}` attribute")]
    Missing {
        /// Node lacking the attribute.
        node: NodeId,
        /// Name of the missing attribute.
        attribute: &'static str,
    },
    /// The attribute is not a decimal number.
    #[error("node {node} has unparseable `{attribute}` value {value:?}")]
    Invalid {
        /// Node carrying the attribute.
        node: NodeId,
        /// Name of the attribute.
        attribute: &'static str,
        /// Raw attribute value.
        value: String,
        /// Parser failure.
        #[source]
        source: ParseFloatError,
    },
    /// The attribute parsed to NaN or an infinity.
    #[error("node {node} has non-finite `{attribute}` value {value:?}")]
    NonFinite {
        /// Node carrying the attribute.
        node: NodeId,
        /// Name of the attribute.
        attribute: &'static str,
        /// Raw attribute value.
        value: String,
    },
}

/// A vertex of the road network.
///
/// Nodes keep the attributes they were defined with (at least `lat` and
/// `lon`) together with two indexes maintained by
/// [`NetworkGraph`](crate::NetworkGraph): the set of adjacent nodes and the
/// set of ways the node belongs to.
///
/// # Examples
///
/// ```
/// use waygraph_core::{Node, NodeId};
///
/// # fn main() -> Result<(), waygraph_core::CoordinateError> {
/// let node = Node::at(NodeId(7), 52.52, 13.405);
/// let coord = node.coord()?;
/// assert_eq!(coord.y, 52.52);
/// assert!(node.neighbours().is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    attributes: Tags,
    neighbours: BTreeSet<NodeId>,
    ways: BTreeSet<WayId>,
}

impl Node {
    /// Creates a node with the given attributes and empty indexes.
    #[must_use]
    pub const fn new(id: NodeId, attributes: Tags) -> Self {
        Self {
            id,
            attributes,
            neighbours: BTreeSet::new(),
            ways: BTreeSet::new(),
        }
    }

    /// Creates a node whose only attributes are its coordinates.
    #[must_use]
    pub fn at(id: NodeId, lat: f64, lon: f64) -> Self {
        let mut attributes = Tags::new();
        attributes.insert(LAT.to_owned(), lat.to_string());
        attributes.insert(LON.to_owned(), lon.to_string());
        Self::new(id, attributes)
    }

    /// Identifier of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// All attributes, including `lat` and `lon`.
    #[must_use]
    pub const fn attributes(&self) -> &Tags {
        &self.attributes
    }

    /// Mutable access to the attributes, for parsers that collect tags after
    /// the node was opened. Existing segment weights are not recomputed.
    pub const fn attributes_mut(&mut self) -> &mut Tags {
        &mut self.attributes
    }

    /// Looks up a single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Adjacent nodes.
    #[must_use]
    pub const fn neighbours(&self) -> &BTreeSet<NodeId> {
        &self.neighbours
    }

    /// Ways this node is part of.
    #[must_use]
    pub const fn ways(&self) -> &BTreeSet<WayId> {
        &self.ways
    }

    /// Parses the `lat`/`lon` attributes into a coordinate (`x = lon`,
    /// `y = lat`).
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either attribute is missing, not a
    /// number, or not finite.
    pub fn coord(&self) -> Result<Coord<f64>, CoordinateError> {
        Ok(Coord {
            x: self.parse_degrees(LON)?,
            y: self.parse_degrees(LAT)?,
        })
    }

    fn parse_degrees(&self, attribute: &'static str) -> Result<f64, CoordinateError> {
        let raw = self.attribute(attribute).ok_or(CoordinateError::Missing {
            node: self.id,
            attribute,
        })?;
        let degrees = raw
            .trim()
            .parse::<f64>()
            .map_err(|source| CoordinateError::Invalid {
                node: self.id,
                attribute,
                value: raw.to_owned(),
                source,
            })?;
        if degrees.is_finite() {
            Ok(degrees)
        } else {
            Err(CoordinateError::NonFinite {
                node: self.id,
                attribute,
                value: raw.to_owned(),
            })
        }
    }

    pub(crate) fn add_neighbour(&mut self, neighbour: NodeId) {
        self.neighbours.insert(neighbour);
    }

    pub(crate) fn drop_neighbour(&mut self, neighbour: NodeId) -> bool {
        self.neighbours.remove(&neighbour)
    }

    pub(crate) fn add_to_way(&mut self, way: WayId) {
        self.ways.insert(way);
    }

    pub(crate) fn drop_from_way(&mut self, way: WayId) -> bool {
        self.ways.remove(&way)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NODE {} : neighbours (", self.id)?;
        write_joined(f, &self.neighbours)?;
        f.write_str(") ways (")?;
        write_joined(f, &self.ways)?;
        f.write_str(") tags (")?;
        write_tags(f, &self.attributes)?;
        f.write_str(")")
    }
}

pub(super) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

pub(super) fn write_tags(f: &mut fmt::Formatter<'_>, tags: &Tags) -> fmt::Result {
    write_joined(f, tags.iter().map(|(key, value)| format!("{key}={value}")))
}
