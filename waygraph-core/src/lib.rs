//! Core road network model for waygraph.
//!
//! Responsibilities:
//! - Geodesic distance on the WGS84 ellipsoid ([`geodesic`]).
//! - Edge weighting policies ([`weight`]).
//! - The node/way/segment graph ([`NetworkGraph`]).
//! - Collapse of interior degree-2 nodes ([`simplify`]).
//!
//! Boundaries:
//! - No file formats or I/O (live in `waygraph-data`).
//!
//! Invariants:
//! - Graph mutation requires exclusive access; there is no internal locking.
//! - Distance and weight computations are pure and thread-safe.

#![forbid(unsafe_code)]

pub mod geodesic;
pub mod network;
pub mod simplify;
pub mod test_support;
pub mod weight;

pub use geodesic::{GeodesicError, NO_CONVERGENCE, distance, is_no_convergence, try_distance};
pub use network::{
    CoordinateError, Directionality, HIGHWAY, LAT, LON, NetworkError, NetworkGraph, Node, NodeId,
    Segment, Tags, Way, WayId,
};
pub use simplify::{SimplifyError, SimplifyReport};
pub use weight::{
    EdgeWeightPolicy, RoadClass, RoadImportance, RoadImportanceDistance, UniformWeight,
    UnknownWeightingScheme, WeightError, WeightingScheme,
};
