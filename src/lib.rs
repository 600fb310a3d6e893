//! Facade crate for waygraph, the OpenStreetMap road graph builder.
//!
//! This crate re-exports the road network model and, behind the `data`
//! feature, the OSM XML reader and GEXF writer.

#![forbid(unsafe_code)]

pub use waygraph_core::{
    CoordinateError, Directionality, EdgeWeightPolicy, NetworkError, NetworkGraph, Node, NodeId,
    RoadClass, RoadImportance, RoadImportanceDistance, Segment, SimplifyReport, Tags,
    UniformWeight, Way, WayId, WeightError, WeightingScheme, distance,
};

#[cfg(feature = "data")]
pub use waygraph_data::{
    GexfError, GexfSummary, IngestOptions, MissingNodePolicy, OsmIngestError, OsmIngestSummary,
    WayFilter, WayFilterChain, ingest_osm_xml, write_gexf_file,
};
