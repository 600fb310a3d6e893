//! Edge weighting strategies.
//!
//! A policy turns two adjacent nodes and the way joining them into a scalar
//! weight. The default, [`RoadImportanceDistance`], multiplies the
//! road-importance factor of the way's `highway` class by the geodesic
//! distance between the endpoints.

use std::fmt;
use std::str::FromStr;

use log::warn;
use thiserror::Error;

use crate::geodesic::{NO_CONVERGENCE, try_distance};
use crate::network::{CoordinateError, Node, Way};

/// Errors raised while weighting a segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightError {
    /// An endpoint lacks usable coordinates.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

/// Computes the weight of the segment joining `from` and `to` along `way`.
///
/// Implementations must be pure: the same inputs always yield the same
/// weight, so the graph may mirror a weight instead of recomputing it.
pub trait EdgeWeightPolicy: fmt::Debug + Send + Sync {
    /// Weight of the directed segment `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError`] when the policy needs coordinates that the
    /// endpoints do not carry.
    fn weight(&self, from: &Node, to: &Node, way: &Way) -> Result<f64, WeightError>;
}

/// Road classification derived from a way's `highway` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadClass {
    /// `highway=motorway`.
    Motorway,
    /// `highway=trunk`.
    Trunk,
    /// `highway=primary`.
    Primary,
    /// `highway=secondary`.
    Secondary,
    /// `highway=tertiary`.
    Tertiary,
    /// `highway=residential`.
    Residential,
    /// `highway=service`.
    Service,
    /// `highway=unclassified`.
    Unclassified,
    /// Any other value, or no `highway` tag at all.
    Other,
}

impl RoadClass {
    /// Classifies a `highway` tag value.
    #[must_use]
    pub fn from_highway(value: Option<&str>) -> Self {
        match value {
            Some("motorway") => Self::Motorway,
            Some("trunk") => Self::Trunk,
            Some("primary") => Self::Primary,
            Some("secondary") => Self::Secondary,
            Some("tertiary") => Self::Tertiary,
            Some("residential") => Self::Residential,
            Some("service") => Self::Service,
            Some("unclassified") => Self::Unclassified,
            _ => Self::Other,
        }
    }

    /// Classifies a way by its `highway` tag.
    #[must_use]
    pub fn of(way: &Way) -> Self {
        Self::from_highway(way.highway())
    }

    /// Dimensionless importance multiplier for this class.
    #[must_use]
    pub const fn importance(self) -> f64 {
        match self {
            Self::Motorway => 16.0,
            Self::Trunk => 8.0,
            Self::Primary => 6.0,
            Self::Secondary => 4.0,
            Self::Tertiary => 3.0,
            Self::Residential => 1.5,
            Self::Service | Self::Unclassified | Self::Other => 1.0,
        }
    }
}

/// Every segment weighs `1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformWeight;

impl EdgeWeightPolicy for UniformWeight {
    fn weight(&self, _from: &Node, _to: &Node, _way: &Way) -> Result<f64, WeightError> {
        Ok(1.0)
    }
}

/// Weight is the importance multiplier of the way's road class alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadImportance;

impl EdgeWeightPolicy for RoadImportance {
    fn weight(&self, _from: &Node, _to: &Node, way: &Way) -> Result<f64, WeightError> {
        Ok(RoadClass::of(way).importance())
    }
}

/// Weight is the road-class importance multiplied by the geodesic distance
/// between the endpoints in metres.
///
/// A non-converging distance is passed through as the
/// [`NO_CONVERGENCE`](crate::geodesic::NO_CONVERGENCE) sentinel scaled by the
/// multiplier; callers that care can test for a negative weight.
///
/// # Examples
///
/// ```
/// use waygraph_core::{EdgeWeightPolicy, Node, NodeId, RoadImportanceDistance, Way, WayId};
///
/// # fn main() -> Result<(), waygraph_core::WeightError> {
/// let from = Node::at(NodeId(1), 0.0, 0.0);
/// let to = Node::at(NodeId(2), 0.0, 0.001);
/// let way = Way::road(WayId(10), "residential", vec![NodeId(1), NodeId(2)]);
/// let weight = RoadImportanceDistance.weight(&from, &to, &way)?;
/// assert!((weight - 1.5 * 111.319_49).abs() < 1.0e-2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadImportanceDistance;

impl EdgeWeightPolicy for RoadImportanceDistance {
    #[expect(
        clippy::float_arithmetic,
        reason = "weights scale a distance by a multiplier"
    )]
    fn weight(&self, from: &Node, to: &Node, way: &Way) -> Result<f64, WeightError> {
        let importance = RoadImportance.weight(from, to, way)?;
        let metres = try_distance(from.coord()?, to.coord()?).unwrap_or_else(|err| {
            warn!(
                "Distance between nodes {} and {} on way {}: {err}",
                from.id(),
                to.id(),
                way.id()
            );
            NO_CONVERGENCE
        });
        Ok(importance * metres)
    }
}

/// Configurable choice between the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightingScheme {
    /// [`UniformWeight`].
    Uniform,
    /// [`RoadImportance`].
    Importance,
    /// [`RoadImportanceDistance`].
    #[default]
    ImportanceDistance,
}

impl WeightingScheme {
    /// Configuration names accepted by [`FromStr`].
    pub const NAMES: [&'static str; 3] = ["uniform", "importance", "importance-distance"];

    /// Configuration name of this scheme.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Importance => "importance",
            Self::ImportanceDistance => "importance-distance",
        }
    }
}

impl fmt::Display for WeightingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`WeightingScheme`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weighting scheme {name:?} (expected one of: uniform, importance, importance-distance)")]
pub struct UnknownWeightingScheme {
    /// Name that failed to parse.
    pub name: String,
}

impl FromStr for WeightingScheme {
    type Err = UnknownWeightingScheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "uniform" => Ok(Self::Uniform),
            "importance" => Ok(Self::Importance),
            "importance-distance" => Ok(Self::ImportanceDistance),
            other => Err(UnknownWeightingScheme {
                name: other.to_owned(),
            }),
        }
    }
}

impl EdgeWeightPolicy for WeightingScheme {
    fn weight(&self, from: &Node, to: &Node, way: &Way) -> Result<f64, WeightError> {
        match self {
            Self::Uniform => UniformWeight.weight(from, to, way),
            Self::Importance => RoadImportance.weight(from, to, way),
            Self::ImportanceDistance => RoadImportanceDistance.weight(from, to, way),
        }
    }
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::float_arithmetic,
        reason = "tests compare floating-point weights"
    )]

    use super::*;
    use crate::geodesic::distance;
    use crate::network::{NodeId, Tags, WayId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn endpoints() -> (Node, Node) {
        (
            Node::at(NodeId(1), 51.5, -0.12),
            Node::at(NodeId(2), 51.501, -0.121),
        )
    }

    fn road(class: &str) -> Way {
        Way::road(WayId(1), class, vec![NodeId(1), NodeId(2)])
    }

    #[rstest]
    #[case("motorway", 16.0)]
    #[case("trunk", 8.0)]
    #[case("primary", 6.0)]
    #[case("secondary", 4.0)]
    #[case("tertiary", 3.0)]
    #[case("residential", 1.5)]
    #[case("service", 1.0)]
    #[case("unclassified", 1.0)]
    #[case("footway", 1.0)]
    fn importance_follows_lookup_table(#[case] class: &str, #[case] expected: f64) {
        assert_eq!(RoadClass::of(&road(class)).importance(), expected);
    }

    #[rstest]
    fn untagged_way_has_unit_importance() {
        let way = Way::new(WayId(1), Tags::new(), vec![NodeId(1), NodeId(2)]);
        assert_eq!(RoadClass::of(&way), RoadClass::Other);
        assert_eq!(RoadClass::of(&way).importance(), 1.0);
    }

    #[rstest]
    fn distance_weight_scales_geodesic_distance(endpoints: (Node, Node)) {
        let (from, to) = endpoints;
        let weight = RoadImportanceDistance
            .weight(&from, &to, &road("primary"))
            .expect("coordinates are valid");
        let expected = 6.0 * distance(51.5, -0.12, 51.501, -0.121);
        assert!((weight - expected).abs() < 1.0e-9, "got {weight}");
    }

    #[rstest]
    #[case(0.001)]
    #[case(0.25)]
    #[case(10.0)]
    fn doubling_distance_doubles_weight(#[case] step: f64) {
        let origin = Node::at(NodeId(1), 0.0, 0.0);
        let near = Node::at(NodeId(2), 0.0, step);
        let far = Node::at(NodeId(3), 0.0, 2.0 * step);
        let way = road("residential");

        let single = RoadImportanceDistance
            .weight(&origin, &near, &way)
            .expect("coordinates are valid");
        let double = RoadImportanceDistance
            .weight(&origin, &far, &way)
            .expect("coordinates are valid");
        assert!(
            (double - 2.0 * single).abs() <= 1.0e-6 * double,
            "{double} is not twice {single}"
        );
    }

    #[rstest]
    fn uniform_and_importance_ignore_coordinates() {
        let from = Node::new(NodeId(1), Tags::new());
        let to = Node::new(NodeId(2), Tags::new());
        let way = road("trunk");
        assert_eq!(UniformWeight.weight(&from, &to, &way), Ok(1.0));
        assert_eq!(RoadImportance.weight(&from, &to, &way), Ok(8.0));
    }

    #[rstest]
    fn missing_coordinates_fail_fast(endpoints: (Node, Node)) {
        let (from, _) = endpoints;
        let mut attributes = Tags::new();
        attributes.insert("lat".into(), "51.5".into());
        let to = Node::new(NodeId(9), attributes);
        let err = RoadImportanceDistance
            .weight(&from, &to, &road("primary"))
            .expect_err("missing lon should fail");
        assert_eq!(
            err,
            WeightError::Coordinate(CoordinateError::Missing {
                node: NodeId(9),
                attribute: "lon",
            })
        );
    }

    #[rstest]
    #[case("north")]
    #[case("")]
    #[case("NaN")]
    fn unusable_coordinates_fail_fast(endpoints: (Node, Node), #[case] raw: &str) {
        let (from, _) = endpoints;
        let mut attributes = Tags::new();
        attributes.insert("lat".into(), raw.into());
        attributes.insert("lon".into(), "0.0".into());
        let to = Node::new(NodeId(9), attributes);
        let result = RoadImportanceDistance.weight(&from, &to, &road("primary"));
        assert!(
            matches!(
                result,
                Err(WeightError::Coordinate(
                    CoordinateError::Invalid { .. } | CoordinateError::NonFinite { .. }
                ))
            ),
            "unexpected result {result:?}"
        );
    }

    #[rstest]
    fn non_converging_distance_yields_scaled_sentinel() {
        let from = Node::at(NodeId(1), 0.0, 0.0);
        let to = Node::at(NodeId(2), 0.0, 180.0);
        let weight = RoadImportanceDistance
            .weight(&from, &to, &road("tertiary"))
            .expect("coordinates are valid");
        assert_eq!(weight, 3.0 * NO_CONVERGENCE);
    }

    #[rstest]
    #[case("uniform", WeightingScheme::Uniform)]
    #[case("importance", WeightingScheme::Importance)]
    #[case(" importance-distance ", WeightingScheme::ImportanceDistance)]
    fn parses_scheme_names(#[case] raw: &str, #[case] expected: WeightingScheme) {
        assert_eq!(raw.parse::<WeightingScheme>(), Ok(expected));
        assert_eq!(expected.to_string(), raw.trim());
    }

    #[rstest]
    fn rejects_unknown_scheme() {
        let err = "shortest".parse::<WeightingScheme>().expect_err("unknown");
        assert_eq!(err.name, "shortest");
    }

    #[rstest]
    fn scheme_delegates_to_policy(endpoints: (Node, Node)) {
        let (from, to) = endpoints;
        let way = road("secondary");
        assert_eq!(
            WeightingScheme::ImportanceDistance.weight(&from, &to, &way),
            RoadImportanceDistance.weight(&from, &to, &way)
        );
        assert_eq!(WeightingScheme::Importance.weight(&from, &to, &way), Ok(4.0));
    }
}
