//! Attribute helpers for OSM XML elements.
//!
//! Provides helpers to:
//! - copy every attribute of an element into a [`Tags`] map; and
//! - read a single attribute, with required identifiers parsed to `i64`.

use quick_xml::events::BytesStart;
use waygraph_core::Tags;

use super::OsmIngestError;

/// Copies all attributes of `element`, unescaped.
pub(super) fn attribute_map(
    element: &BytesStart<'_>,
    position: usize,
) -> Result<Tags, OsmIngestError> {
    let mut attributes = Tags::new();
    for entry in element.attributes().with_checks(false) {
        let attribute = entry.map_err(|source| OsmIngestError::Xml {
            position,
            source: source.into(),
        })?;
        let value = attribute
            .unescape_value()
            .map_err(|source| OsmIngestError::Xml { position, source })?;
        attributes.insert(
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            value.into_owned(),
        );
    }
    Ok(attributes)
}

/// Reads attribute `key`, failing when it is absent.
pub(super) fn required_attribute(
    element: &BytesStart<'_>,
    tag: &'static str,
    key: &'static str,
    position: usize,
) -> Result<String, OsmIngestError> {
    for entry in element.attributes().with_checks(false) {
        let attribute = entry.map_err(|source| OsmIngestError::Xml {
            position,
            source: source.into(),
        })?;
        if attribute.key.as_ref() == key.as_bytes() {
            return attribute
                .unescape_value()
                .map(|value| value.into_owned())
                .map_err(|source| OsmIngestError::Xml { position, source });
        }
    }
    Err(OsmIngestError::MissingAttribute {
        element: tag,
        attribute: key,
        position,
    })
}

/// Reads attribute `key` of `element` as an OSM identifier.
pub(super) fn required_id(
    element: &BytesStart<'_>,
    tag: &'static str,
    key: &'static str,
    position: usize,
) -> Result<i64, OsmIngestError> {
    let raw = required_attribute(element, tag, key, position)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| OsmIngestError::InvalidId {
            element: tag,
            value: raw.clone(),
            position,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn element(raw: &str) -> BytesStart<'_> {
        BytesStart::from_content(raw, raw.find(' ').unwrap_or(raw.len()))
    }

    #[rstest]
    fn copies_and_unescapes_every_attribute() {
        let node = element(r#"node id="7" lat="1.5" lon="-2" user="A &amp; B""#);
        let attributes = attribute_map(&node, 0).expect("attributes parse");
        assert_eq!(attributes.len(), 4);
        assert_eq!(attributes.get("user").map(String::as_str), Some("A & B"));
        assert_eq!(attributes.get("lat").map(String::as_str), Some("1.5"));
    }

    #[rstest]
    #[case(r#"nd ref="42""#, Ok(42))]
    #[case(r#"nd ref=" -3 ""#, Ok(-3))]
    fn parses_identifiers(#[case] raw: &str, #[case] expected: Result<i64, ()>) {
        let parsed = required_id(&element(raw), "nd", "ref", 0).map_err(|_| ());
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn reports_missing_attribute() {
        let err = required_id(&element(r#"nd role="x""#), "nd", "ref", 9).expect_err("no ref");
        assert!(
            matches!(
                err,
                OsmIngestError::MissingAttribute {
                    element: "nd",
                    attribute: "ref",
                    position: 9,
                }
            ),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn reports_unparseable_identifier() {
        let err = required_id(&element(r#"way id="w12""#), "way", "id", 3).expect_err("bad id");
        match err {
            OsmIngestError::InvalidId { element, value, .. } => {
                assert_eq!(element, "way");
                assert_eq!(value, "w12");
            }
            other => panic!("expected invalid id, got {other:?}"),
        }
    }
}
