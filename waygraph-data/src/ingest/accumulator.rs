//! Streaming state machine turning OSM XML events into network mutations.
//!
//! Nodes are committed when their element closes, ways once their node
//! references and tags are complete and the filter chain accepts them.
//! Relations are counted and otherwise ignored, including their nested tags.

use log::{debug, warn};
use quick_xml::events::BytesStart;
use waygraph_core::{LAT, LON, NetworkGraph, Node, NodeId, Tags, Way, WayId};

use super::filter::WayFilter;
use super::tags::{attribute_map, required_attribute, required_id};
use super::{IngestOptions, MissingNodePolicy, OsmIngestError, OsmIngestSummary};

/// Element currently being assembled.
#[derive(Debug, Default)]
enum OpenElement {
    #[default]
    None,
    Node(Node),
    Way {
        id: WayId,
        tags: Tags,
        nodes: Vec<NodeId>,
    },
    Relation,
}

pub(super) struct OsmXmlAccumulator<'a> {
    network: &'a mut NetworkGraph,
    options: &'a IngestOptions,
    summary: OsmIngestSummary,
    open: OpenElement,
}

impl<'a> OsmXmlAccumulator<'a> {
    pub(super) fn new(network: &'a mut NetworkGraph, options: &'a IngestOptions) -> Self {
        Self {
            network,
            options,
            summary: OsmIngestSummary::default(),
            open: OpenElement::None,
        }
    }

    /// Handles a start (or self-closing) tag.
    pub(super) fn open(
        &mut self,
        element: &BytesStart<'_>,
        position: usize,
    ) -> Result<(), OsmIngestError> {
        match element.name().as_ref() {
            b"node" => self.open_node(element, position),
            b"way" => {
                let id = required_id(element, "way", "id", position)?;
                self.summary.ways += 1;
                self.open = OpenElement::Way {
                    id: WayId(id),
                    tags: Tags::new(),
                    nodes: Vec::new(),
                };
                Ok(())
            }
            b"relation" => {
                self.summary.relations += 1;
                self.open = OpenElement::Relation;
                Ok(())
            }
            b"nd" => {
                if let OpenElement::Way { nodes, .. } = &mut self.open {
                    nodes.push(NodeId(required_id(element, "nd", "ref", position)?));
                }
                Ok(())
            }
            b"tag" => self.add_tag(element, position),
            _ => Ok(()),
        }
    }

    /// Handles an end tag (or the implicit end of a self-closing tag).
    pub(super) fn close(&mut self, name: &[u8]) -> Result<(), OsmIngestError> {
        match (name, std::mem::take(&mut self.open)) {
            (b"node", OpenElement::Node(node)) => {
                self.network.add_node(node);
                Ok(())
            }
            (b"way", OpenElement::Way { id, tags, nodes }) => {
                self.commit_way(Way::new(id, tags, nodes))
            }
            (b"node" | b"way" | b"relation", _) => Ok(()),
            (_, still_open) => {
                self.open = still_open;
                Ok(())
            }
        }
    }

    pub(super) fn finish(self) -> OsmIngestSummary {
        self.summary
    }

    fn open_node(&mut self, element: &BytesStart<'_>, position: usize) -> Result<(), OsmIngestError> {
        let id = required_id(element, "node", "id", position)?;
        let attributes = attribute_map(element, position)?;
        self.summary.record_node(
            parse_degrees(attributes.get(LON)),
            parse_degrees(attributes.get(LAT)),
        );
        self.open = OpenElement::Node(Node::new(NodeId(id), attributes));
        Ok(())
    }

    fn add_tag(&mut self, element: &BytesStart<'_>, position: usize) -> Result<(), OsmIngestError> {
        let target = match &mut self.open {
            OpenElement::Node(node) => node.attributes_mut(),
            OpenElement::Way { tags, .. } => tags,
            OpenElement::None | OpenElement::Relation => return Ok(()),
        };
        let key = required_attribute(element, "tag", "k", position)?;
        let value = required_attribute(element, "tag", "v", position)?;
        target.insert(key, value);
        Ok(())
    }

    fn commit_way(&mut self, way: Way) -> Result<(), OsmIngestError> {
        if !self.options.filters.accept(&way) {
            debug!("Rejected way {} ({:?})", way.id(), way.highway());
            self.summary.rejected_ways += 1;
            return Ok(());
        }
        let way_id = way.id();
        match self.network.add_way(way) {
            Ok(()) => {
                self.summary.accepted_ways += 1;
                Ok(())
            }
            Err(source) => match self.options.missing_nodes {
                MissingNodePolicy::Skip => {
                    warn!("Skipped way {way_id}: {source}");
                    self.summary.skipped_ways += 1;
                    Ok(())
                }
                MissingNodePolicy::Abort => Err(OsmIngestError::Network { source }),
            },
        }
    }
}

fn parse_degrees(raw: Option<&String>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
}
