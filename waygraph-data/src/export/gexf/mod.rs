//! GEXF 1.2 document writer.
//!
//! Layout: a `graph` with two float node attributes, `lat` (id 0) and `lon`
//! (id 1), followed by the connected nodes and one `edge` per directed
//! segment. Coordinates are copied verbatim from the node attributes.

use std::io::Write;

use log::info;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use waygraph_core::{LAT, LON, NetworkGraph, Node};

use super::{GexfError, GexfSummary};

/// Namespace of GEXF 1.2draft documents.
pub const GEXF_NAMESPACE: &str = "http://www.gexf.net/1.2draft";

const CREATOR: &str = "waygraph";
const DESCRIPTION: &str = "Road network derived from OpenStreetMap";

/// Node attribute columns as `(id, title)`.
const NODE_ATTRIBUTES: [(&str, &str); 2] = [("0", LAT), ("1", LON)];

/// Writes `network` as a GEXF document to `sink`.
///
/// Only nodes with at least one neighbour are written. Edges receive
/// sequential identifiers in `(source, target)` order and weights with four
/// decimal places.
///
/// # Examples
///
/// ```
/// use waygraph_core::{NetworkGraph, Node, NodeId, Way, WayId};
/// use waygraph_data::write_gexf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut network = NetworkGraph::new();
/// network.add_node(Node::at(NodeId(1), 0.0, 0.0));
/// network.add_node(Node::at(NodeId(2), 0.0, 0.001));
/// network.add_way(Way::road(WayId(7), "primary", vec![NodeId(1), NodeId(2)]))?;
///
/// let mut out = Vec::new();
/// let summary = write_gexf(&network, &mut out)?;
/// assert_eq!((summary.nodes, summary.edges), (2, 2));
/// assert!(String::from_utf8(out)?.contains(r#"source="1" target="2""#));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`GexfError::Xml`] when writing fails and [`GexfError::Io`] when
/// the sink cannot be flushed.
pub fn write_gexf<W: Write>(network: &NetworkGraph, sink: W) -> Result<GexfSummary, GexfError> {
    let mut writer = Writer::new_with_indent(sink, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("gexf").with_attributes([("xmlns", GEXF_NAMESPACE), ("version", "1.2")]),
    ))?;
    write_meta(&mut writer)?;
    writer.write_event(Event::Start(
        BytesStart::new("graph")
            .with_attributes([("mode", "static"), ("defaultedgetype", "directed")]),
    ))?;
    write_attribute_declarations(&mut writer)?;

    let mut summary = GexfSummary::default();
    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for node in network.connected_nodes() {
        write_node(&mut writer, node)?;
        summary.nodes += 1;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (index, segment) in network.segments().enumerate() {
        let id = index.to_string();
        let source = segment.from.to_string();
        let target = segment.to.to_string();
        let weight = format!("{:.4}", segment.weight);
        writer.write_event(Event::Empty(BytesStart::new("edge").with_attributes([
            ("id", id.as_str()),
            ("source", source.as_str()),
            ("target", target.as_str()),
            ("weight", weight.as_str()),
        ])))?;
        summary.edges += 1;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;
    writer.into_inner().flush()?;
    info!(
        "Wrote GEXF with {} nodes and {} edges",
        summary.nodes, summary.edges
    );
    Ok(summary)
}

fn write_meta<W: Write>(writer: &mut Writer<W>) -> Result<(), GexfError> {
    writer.write_event(Event::Start(BytesStart::new("meta")))?;
    for (name, text) in [("creator", CREATOR), ("description", DESCRIPTION)] {
        writer.write_event(Event::Start(BytesStart::new(name)))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("meta")))?;
    Ok(())
}

fn write_attribute_declarations<W: Write>(writer: &mut Writer<W>) -> Result<(), GexfError> {
    writer.write_event(Event::Start(
        BytesStart::new("attributes").with_attributes([("class", "node")]),
    ))?;
    for (id, title) in NODE_ATTRIBUTES {
        writer.write_event(Event::Empty(BytesStart::new("attribute").with_attributes([
            ("id", id),
            ("title", title),
            ("type", "float"),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("attributes")))?;
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), GexfError> {
    let id = node.id().to_string();
    writer.write_event(Event::Start(
        BytesStart::new("node").with_attributes([("id", id.as_str()), ("label", id.as_str())]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("attvalues")))?;
    for (column, key) in NODE_ATTRIBUTES {
        if let Some(value) = node.attribute(key) {
            writer.write_event(Event::Empty(
                BytesStart::new("attvalue").with_attributes([("for", column), ("value", value)]),
            ))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("attvalues")))?;
    writer.write_event(Event::End(BytesEnd::new("node")))?;
    Ok(())
}
