//! File formats for the waygraph road network.
//!
//! Responsibilities:
//! - Stream OpenStreetMap XML into a [`waygraph_core::NetworkGraph`].
//! - Write the simplified network as GEXF for graph tools such as Gephi.
//!
//! Boundaries:
//! - Do not encode graph rules (live in `waygraph-core`).
//! - File access goes through `waygraph-fs`.
//!
//! Invariants:
//! - Readers and writers are synchronous and hold no global state.

#![forbid(unsafe_code)]

pub mod export;
pub mod ingest;

pub use export::{GEXF_NAMESPACE, GexfError, GexfSummary, write_gexf, write_gexf_file};
pub use ingest::{
    AcceptAll, HighwayFilter, IngestOptions, MissingNodePolicy, OsmElementCounts, OsmIngestError,
    OsmIngestSummary, WayFilter, WayFilterChain, count_osm_xml, count_osm_xml_reader,
    ingest_osm_xml, ingest_osm_xml_reader,
};
