//! Reader for curated .osm input files.
//!
//! Input datasets are plain OSM XML with one `<node>` per record. Only
//! nodes are read; ways and relations in an input file are skipped, as
//! are any provenance attributes. Tag keys and values are unescaped.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use tagsync_model::Element;

use crate::error::{OsmError, OsmResult};

/// Parse the node records of an OSM XML document.
pub fn parse_nodes(xml: &str) -> OsmResult<Vec<Element>> {
    let mut reader = Reader::from_str(xml);
    let mut elements = Vec::new();
    let mut current: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.local_name().as_ref() == b"node" => {
                current = Some(node_from_attributes(e)?);
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"node" => {
                elements.push(node_from_attributes(e)?);
            }
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"tag" => {
                // Tags outside a node (e.g. on a way) are ignored.
                if let Some(node) = current.as_mut() {
                    let (key, value) = tag_from_attributes(e)?;
                    node.tags.insert(key, value);
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"node" => {
                if let Some(node) = current.take() {
                    elements.push(node);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(elements)
}

/// Read and parse an .osm input file.
pub fn read_nodes_file(path: &Path) -> OsmResult<Vec<Element>> {
    let xml = std::fs::read_to_string(path)?;
    parse_nodes(&xml)
}

fn node_from_attributes(e: &BytesStart<'_>) -> OsmResult<Element> {
    let mut id = 0i64;
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"id" => {
                id = value
                    .parse()
                    .map_err(|_| OsmError::Malformed(format!("invalid node id '{value}'")))?;
            }
            b"lat" => lat = Some(parse_coordinate(&value, "lat")?),
            b"lon" => lon = Some(parse_coordinate(&value, "lon")?),
            _ => {}
        }
    }

    let lat = lat.ok_or_else(|| missing_attribute(id, "lat"))?;
    let lon = lon.ok_or_else(|| missing_attribute(id, "lon"))?;
    Ok(Element::node(id, lat, lon, BTreeMap::new()))
}

fn tag_from_attributes(e: &BytesStart<'_>) -> OsmResult<(String, String)> {
    let mut key = None;
    let mut value = None;

    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"k" => key = Some(attr.unescape_value()?.into_owned()),
            b"v" => value = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    match (key, value) {
        (Some(key), Some(value)) => Ok((key, value)),
        (None, _) => Err(OsmError::Malformed("tag element missing k attribute".to_string())),
        (_, None) => Err(OsmError::Malformed("tag element missing v attribute".to_string())),
    }
}

fn parse_coordinate(value: &str, name: &str) -> OsmResult<f64> {
    value
        .parse()
        .map_err(|_| OsmError::Malformed(format!("invalid {name} coordinate '{value}'")))
}

fn missing_attribute(id: i64, name: &str) -> OsmError {
    OsmError::Malformed(format!("node {id} missing the {name} attribute"))
}
