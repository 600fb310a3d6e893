//! Streaming OpenStreetMap XML ingestion into a [`NetworkGraph`].

use std::io::{self, BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use geo::{Coord, Rect};
use log::info;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use thiserror::Error;
use waygraph_core::{NetworkError, NetworkGraph};
use waygraph_fs::open_utf8_file;

mod accumulator;
mod filter;
mod tags;

pub use filter::{AcceptAll, HighwayFilter, WayFilter, WayFilterChain};

use accumulator::OsmXmlAccumulator;

/// Summary of an ingestion run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmIngestSummary {
    /// Number of `<node>` elements read.
    pub nodes: u64,
    /// Number of `<way>` elements read.
    pub ways: u64,
    /// Number of `<relation>` elements read.
    pub relations: u64,
    /// Ways added to the network.
    pub accepted_ways: u64,
    /// Ways turned away by the filter chain.
    pub rejected_ways: u64,
    /// Accepted ways the network refused, typically because they reference
    /// undefined nodes.
    pub skipped_ways: u64,
    /// Bounding box covering all valid node coordinates, if any.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl OsmIngestSummary {
    fn record_node(&mut self, lon: Option<f64>, lat: Option<f64>) {
        self.nodes += 1;
        if let (Some(x), Some(y)) = (lon, lat) {
            self.include(x, y);
        }
    }

    fn include(&mut self, lon: f64, lat: f64) {
        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);
        if !valid {
            return;
        }
        let coordinate = Coord { x: lon, y: lat };
        self.bounds = Some(match self.bounds {
            Some(existing) => Rect::new(
                Coord {
                    x: existing.min().x.min(lon),
                    y: existing.min().y.min(lat),
                },
                Coord {
                    x: existing.max().x.max(lon),
                    y: existing.max().y.max(lat),
                },
            ),
            None => Rect::new(coordinate, coordinate),
        });
    }
}

/// Raw element counts of an OSM XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OsmElementCounts {
    /// Number of `<node>` elements.
    pub nodes: u64,
    /// Number of `<way>` elements.
    pub ways: u64,
    /// Number of `<relation>` elements.
    pub relations: u64,
}

/// What to do when the network refuses an accepted way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingNodePolicy {
    /// Log the way at `warn`, count it and carry on.
    #[default]
    Skip,
    /// Stop ingesting and return [`OsmIngestError::Network`].
    Abort,
}

/// Ingestion settings.
#[derive(Debug)]
pub struct IngestOptions {
    /// Filters every way must pass before it is added.
    pub filters: WayFilterChain,
    /// Handling of ways the network refuses.
    pub missing_nodes: MissingNodePolicy,
}

impl Default for IngestOptions {
    /// Road classes from [`HighwayFilter::default`], skipping broken ways.
    fn default() -> Self {
        Self::new(WayFilterChain::new().with(HighwayFilter::default()))
    }
}

impl IngestOptions {
    /// Options using `filters` and [`MissingNodePolicy::Skip`].
    #[must_use]
    pub fn new(filters: WayFilterChain) -> Self {
        Self {
            filters,
            missing_nodes: MissingNodePolicy::default(),
        }
    }

    /// Sets the handling of ways the network refuses.
    #[must_use]
    pub const fn with_missing_nodes(mut self, policy: MissingNodePolicy) -> Self {
        self.missing_nodes = policy;
        self
    }
}

/// Errors returned when reading an OSM XML document.
#[derive(Debug, Error)]
pub enum OsmIngestError {
    /// The input file could not be opened.
    #[error("failed to open OSM XML file at {path}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The document is not well-formed XML.
    #[error("malformed OSM XML near byte {position}")]
    Xml {
        /// Reader offset when the error was detected.
        position: usize,
        /// Parser failure.
        #[source]
        source: quick_xml::Error,
    },
    /// A required attribute is absent.
    #[error("<{element}> near byte {position} has no `{attribute}` attribute")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// Reader offset after the element.
        position: usize,
    },
    /// An identifier attribute is not an integer.
    #[error("<{element}> near byte {position} has invalid identifier {value:?}")]
    InvalidId {
        /// Element name.
        element: &'static str,
        /// Raw attribute value.
        value: String,
        /// Reader offset after the element.
        position: usize,
    },
    /// The network refused a way under [`MissingNodePolicy::Abort`].
    #[error("failed to add way to the network")]
    Network {
        /// Network failure.
        #[source]
        source: NetworkError,
    },
}

/// Reads the OSM XML file at `path` into `network`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use waygraph_core::NetworkGraph;
/// use waygraph_data::{IngestOptions, ingest_osm_xml};
///
/// # fn main() -> Result<(), waygraph_data::OsmIngestError> {
/// let mut network = NetworkGraph::new();
/// let summary = ingest_osm_xml(
///     Utf8Path::new("city.osm"),
///     &mut network,
///     &IngestOptions::default(),
/// )?;
/// assert_eq!(summary.accepted_ways as usize, network.way_count());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`OsmIngestError::Open`] when the file cannot be opened and any
/// error of [`ingest_osm_xml_reader`].
pub fn ingest_osm_xml(
    path: &Utf8Path,
    network: &mut NetworkGraph,
    options: &IngestOptions,
) -> Result<OsmIngestSummary, OsmIngestError> {
    let file = open_utf8_file(path).map_err(|source| OsmIngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let summary = ingest_osm_xml_reader(BufReader::new(file), network, options)?;
    info!(
        "Ingested {path}: {} nodes, {} ways ({} accepted, {} rejected, {} skipped), {} relations",
        summary.nodes,
        summary.ways,
        summary.accepted_ways,
        summary.rejected_ways,
        summary.skipped_ways,
        summary.relations
    );
    Ok(summary)
}

/// Reads an OSM XML document from `source` into `network`.
///
/// Nodes must precede the ways referencing them, as in every OSM export.
/// On error the network keeps whatever was committed before the failure.
///
/// # Errors
///
/// Returns [`OsmIngestError::Xml`] for malformed XML,
/// [`OsmIngestError::MissingAttribute`] or [`OsmIngestError::InvalidId`] for
/// unusable elements and [`OsmIngestError::Network`] when a way is refused
/// under [`MissingNodePolicy::Abort`].
pub fn ingest_osm_xml_reader<R: BufRead>(
    source: R,
    network: &mut NetworkGraph,
    options: &IngestOptions,
) -> Result<OsmIngestSummary, OsmIngestError> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);
    let mut accumulator = OsmXmlAccumulator::new(network, options);
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| OsmIngestError::Xml {
                position: reader.buffer_position(),
                source: err,
            })?;
        let position = reader.buffer_position();
        match event {
            Event::Start(element) => accumulator.open(&element, position)?,
            Event::Empty(element) => {
                accumulator.open(&element, position)?;
                accumulator.close(element.name().as_ref())?;
            }
            Event::End(element) => accumulator.close(element.name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(accumulator.finish())
}

/// Counts the nodes, ways and relations in the OSM XML file at `path`
/// without building a network.
///
/// # Errors
///
/// Returns [`OsmIngestError::Open`] when the file cannot be opened and
/// [`OsmIngestError::Xml`] for malformed XML.
pub fn count_osm_xml(path: &Utf8Path) -> Result<OsmElementCounts, OsmIngestError> {
    let file = open_utf8_file(path).map_err(|source| OsmIngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    count_osm_xml_reader(BufReader::new(file))
}

/// Counts the nodes, ways and relations in an OSM XML document.
///
/// # Errors
///
/// Returns [`OsmIngestError::Xml`] for malformed XML.
pub fn count_osm_xml_reader<R: BufRead>(source: R) -> Result<OsmElementCounts, OsmIngestError> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);
    let mut counts = OsmElementCounts::default();
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| OsmIngestError::Xml {
                position: reader.buffer_position(),
                source: err,
            })?;
        match event {
            Event::Start(element) | Event::Empty(element) => match element.name().as_ref() {
                b"node" => counts.nodes += 1,
                b"way" => counts.ways += 1,
                b"relation" => counts.relations += 1,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(counts)
}
